use super::{DateTemplate, Hypotheses, LabelRule, Lexicon, MonthPrefix, RelativeDay, WeekdayForm};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in Russian/English tables
pub(super) fn builtin() -> Lexicon {
    Lexicon {
        verb_stems: strings(&[
            // Russian
            "провести", "провед", "подготов", "отправ", "созда", "написа", "напиш",
            "провер", "созвон", "связат", "свяж", "позвон", "добав", "исправ", "закры",
            "заплан", "согласова", "обнов", "описа", "опиш", "разверн", "разверт",
            "подключ", "оформ", "назнач", "организова", "организу", "презентова",
            "ожидать", "собрать", "собер", "дать", "дайте", "выполн", "подтверд",
            "утверд", "поделит", "скин", "зафикс", "напомн", "подвести итоги",
            "обсуд", "сдела", "посмотр", "изуч", "отпис",
            // English
            "review", "plan", "schedule", "deploy", "implement", "prepare", "send",
            "create", "write", "check", "fix", "update", "investigate", "present",
            "follow up", "call", "contact", "email", "draft", "share", "book",
            "organize", "set up", "finish",
        ]),
        compound_separators: strings(&[
            "и", "а также", "также", "затем", "после этого", "потом", "далее",
            "and then", "and", "then", "also",
        ]),
        discourse_markers: strings(&[
            "нужно", "надо", "необходимо", "будет", "давайте", "давай", "предлагаю",
            "we need to", "we should", "need to", "let's", "let us",
        ]),
        politeness_markers: strings(&[
            "прошу", "нужно", "надо", "будет", "давайте", "давай", "пожалуйста",
            "please",
        ]),
        hypotheses: Hypotheses {
            ru: "Это конкретное поручение, которое нужно выполнить.".to_string(),
            en: "This is an actionable task to be done.".to_string(),
        },
        relative_days: vec![
            relative("сегодня", 0),
            relative("today", 0),
            relative("завтра", 1),
            relative("tomorrow", 1),
            relative("послезавтра", 2),
            relative("day after tomorrow", 2),
            relative("на следующей неделе", 7),
            relative("next week", 7),
            relative("в следующем спринте", 14),
            relative("next sprint", 14),
        ],
        weekdays: vec![
            weekday("понедельник", 0),
            weekday("вторник", 1),
            weekday("среда", 2),
            weekday("среду", 2),
            weekday("среде", 2),
            weekday("четверг", 3),
            weekday("пятниц", 4),
            weekday("суббот", 5),
            weekday("воскресень", 6),
            weekday("monday", 0),
            weekday("tuesday", 1),
            weekday("wednesday", 2),
            weekday("thursday", 3),
            weekday("friday", 4),
            weekday("saturday", 5),
            weekday("sunday", 6),
        ],
        months: vec![
            month("январ", 1),
            month("феврал", 2),
            month("март", 3),
            month("апрел", 4),
            month("май", 5),
            month("мая", 5),
            month("июн", 6),
            month("июл", 7),
            month("август", 8),
            month("сентябр", 9),
            month("октябр", 10),
            month("ноябр", 11),
            month("декабр", 12),
            month("january", 1),
            month("february", 2),
            month("march", 3),
            month("april", 4),
            month("may", 5),
            month("june", 6),
            month("july", 7),
            month("august", 8),
            month("september", 9),
            month("october", 10),
            month("november", 11),
            month("december", 12),
        ],
        labels: vec![
            label("design", &["design", "макет", "ui", "ux"]),
            label("research", &["research", "исслед"]),
            label("development", &["deploy", "развер", "develop", "implement", "код"]),
            label("documentation", &["докум", "опис", "document"]),
            label("sales", &["client", "клиент", "sales", "предлож"]),
            label("marketing", &["маркет", "кампан", "ads"]),
            label("ops", &["infra", "инфра", "ops", "поддерж"]),
        ],
        urgency_keywords: strings(&["urgent", "asap", "сроч", "критич"]),
        deferral_keywords: strings(&["потом", "later", "low priority", "не горит"]),
        assignee_stoplist: strings(&[
            "we", "i", "you", "he", "she", "they", "мы", "я", "ты", "вы", "он", "она", "они",
        ]),
        date_templates: vec![
            template(r"^\d{1,2}\.\d{1,2}\.\d{4}$", "%d.%m.%Y", true),
            template(r"^\d{1,2}\.\d{1,2}\.\d{2}$", "%d.%m.%y", true),
            template(r"^\d{1,2}/\d{1,2}/\d{4}$", "%d/%m/%Y", true),
            template(r"^\d{1,2}/\d{1,2}/\d{2}$", "%d/%m/%y", true),
            template(r"^\d{4}-\d{1,2}-\d{1,2}$", "%Y-%m-%d", true),
        ],
    }
}

fn relative(keyword: &str, days: i64) -> RelativeDay {
    RelativeDay {
        keyword: keyword.to_string(),
        days,
    }
}

fn weekday(form: &str, weekday: u32) -> WeekdayForm {
    WeekdayForm {
        form: form.to_string(),
        weekday,
    }
}

fn month(prefix: &str, month: u32) -> MonthPrefix {
    MonthPrefix {
        prefix: prefix.to_string(),
        month,
    }
}

fn label(label: &str, keywords: &[&str]) -> LabelRule {
    LabelRule {
        label: label.to_string(),
        keywords: strings(keywords),
    }
}

fn template(shape: &str, format: &str, has_year: bool) -> DateTemplate {
    DateTemplate {
        shape: shape.to_string(),
        format: format.to_string(),
        has_year,
    }
}
