use super::format_footer;
use super::format_greeting;
use super::format_sources;
use super::format_suggestions;
use super::render_delta;
use crate::domain::models::Citation;
use crate::domain::models::Message;
use crate::domain::models::MessageId;
use crate::domain::models::StreamEvent;
use crate::domain::models::UserRole;

fn citation(title: &str, url: &str) -> Citation {
    return Citation {
        title: title.to_string(),
        url: url.to_string(),
    };
}

mod delta {
    use super::*;

    #[test]
    fn it_renders_only_new_content() {
        assert_eq!(render_delta("To login.", 3), "login.");
    }

    #[test]
    fn it_renders_everything_at_first() {
        assert_eq!(render_delta("To ", 0), "To ");
    }

    #[test]
    fn it_renders_nothing_when_caught_up() {
        assert_eq!(render_delta("To login.", 9), "");
    }

    #[test]
    fn it_renders_after_multibyte_characters() {
        let content = "tap «Logg inn».";
        let printed = "tap «".len();
        assert_eq!(render_delta(content, printed), "Logg inn».");
    }

    #[test]
    fn it_renders_nothing_past_the_end() {
        assert_eq!(render_delta("To", 10), "");
    }
}

mod greeting {
    use super::*;

    #[test]
    fn it_greets_with_a_role() {
        insta::assert_snapshot!(format_greeting("kari", Some(UserRole::ConstructionWorker)), @"Hey kari! Ask me anything about the documentation. Answers are tailored for: Construction Worker. Type /help for commands.");
    }

    #[test]
    fn it_greets_without_a_role() {
        insta::assert_snapshot!(format_greeting("kari", None), @"Hey kari! Ask me anything about the documentation. Answers are kept general. Type /help for commands.");
    }
}

mod footer {
    use super::*;

    #[test]
    fn it_formats_sources() {
        let res = format_sources(&[
            citation("Guide", "https://x"),
            citation("", "https://y"),
        ]);
        assert_eq!(res, "Sources:\n  1. Guide (https://x)\n  2. https://y");
    }

    #[test]
    fn it_skips_empty_sources() {
        assert_eq!(format_sources(&[]), "");
    }

    #[test]
    fn it_formats_suggestions() {
        let res = format_suggestions(&["Where is my ID card?".to_string()]);
        assert_eq!(res, "You might also ask:\n  - Where is my ID card?");
    }

    #[test]
    fn it_formats_a_full_footer() {
        let mut msg = Message::new_placeholder(MessageId::new(2));
        msg.apply(StreamEvent::Citation(vec![citation("Guide", "https://x")]));
        msg.apply(StreamEvent::Suggestions(vec![
            "How do I reset my password?".to_string(),
        ]));

        assert_eq!(
            format_footer(&msg),
            "Sources:\n  1. Guide (https://x)\n\nYou might also ask:\n  - How do I reset my password?"
        );
    }

    #[test]
    fn it_has_no_footer_without_metadata() {
        let msg = Message::new_placeholder(MessageId::new(2));
        assert_eq!(format_footer(&msg), "");
    }

    #[test]
    fn it_has_no_footer_for_empty_metadata() {
        let mut msg = Message::new_placeholder(MessageId::new(2));
        msg.apply(StreamEvent::Citation(vec![]));
        msg.apply(StreamEvent::Suggestions(vec![]));
        assert_eq!(format_footer(&msg), "");
    }
}
