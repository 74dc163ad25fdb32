/// Build the enrichment prompt for one action item.
///
/// The model is asked for a compact JSON object; anything it says before
/// or after the object is ignored by the parser.
pub fn build_enrichment_prompt(task: &str, context: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an assistant that prepares Jira tasks from meeting transcripts.\n");
    prompt.push_str(
        "Analyse the action item highlighted below and respond with a compact JSON object \
         that contains the keys summary, assignee, due, priority and labels.\n",
    );
    prompt.push_str("- summary: rephrase the task in 1 short sentence (<= 20 words).\n");
    prompt.push_str(
        "- assignee: person responsible, based on names or mentions. Use null if unknown.\n",
    );
    prompt.push_str("- due: ISO date (YYYY-MM-DD) if a deadline is present, otherwise null.\n");
    prompt.push_str(
        "- priority: High/Medium/Low (or other Jira-friendly value) derived from urgency cues.\n",
    );
    prompt.push_str("- labels: array of 1-3 lowercase tags with no spaces.\n");
    prompt.push_str(&format!("Meeting context: {}\n", context));
    prompt.push_str(&format!("Action item: {}\n", task));
    prompt.push_str("JSON:");

    prompt
}

/// Drop the echoed prompt from a completion, if the backend echoes it
pub fn strip_prompt_echo<'a>(completion: &'a str, prompt: &str) -> &'a str {
    completion.strip_prefix(prompt).unwrap_or(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_task_and_context() {
        let prompt = build_enrichment_prompt("send the deck", "Anna: send the deck by Friday");

        assert!(prompt.contains("Action item: send the deck\n"));
        assert!(prompt.contains("Meeting context: Anna: send the deck by Friday\n"));
        assert!(prompt.ends_with("JSON:"));
    }

    #[test]
    fn test_strip_prompt_echo() {
        let prompt = "P\nJSON:";
        assert_eq!(strip_prompt_echo("P\nJSON: {\"a\": 1}", prompt), " {\"a\": 1}");
        assert_eq!(strip_prompt_echo("{\"a\": 1}", prompt), "{\"a\": 1}");
    }
}
