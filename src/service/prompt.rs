use crate::models::date_context::DateContext;

pub fn history_prompt(date: &DateContext) -> String {
    format!(
        "Give me 3 interesting historical events that happened on {month} {day}. \
         Format each as: \"YEAR: Brief description (1-2 sentences)\". \
         Make them diverse and fascinating. \
         Include different types of events (science, politics, culture, sports, etc.). \
         Each time give me DIFFERENT events - be creative and find lesser-known interesting facts!",
        month = date.month_name(),
        day = date.day
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    #[test]
    fn prompt_names_the_day() {
        let prompt = history_prompt(&DateContext::new(Month::July, 20));
        assert!(prompt.starts_with(
            "Give me 3 interesting historical events that happened on July 20. Format each as:"
        ));
        assert!(prompt.contains("\"YEAR: Brief description (1-2 sentences)\""));
    }

    #[test]
    fn prompt_is_stable_for_a_fixed_date() {
        let date = DateContext::new(Month::March, 5);
        assert_eq!(history_prompt(&date), history_prompt(&date));
        assert_ne!(
            history_prompt(&date),
            history_prompt(&DateContext::new(Month::March, 6))
        );
    }
}
