mod session;

pub use session::ChatSession;

use serde::Serialize;

pub const APPOINTMENT_MARKER: &str = "[SUGGEST_APPOINTMENT]";

/// What the chat endpoint hands back to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub suggest_appointment: bool,
}

impl ChatReply {
    /// Strips every appointment marker and records whether one was present.
    pub fn from_text(text: &str) -> Self {
        Self {
            response: text.replace(APPOINTMENT_MARKER, ""),
            suggest_appointment: text.contains(APPOINTMENT_MARKER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Keep skin moisturized.", "Keep skin moisturized.", false)]
    #[case(
        "See a doctor.\n🏥 [SUGGEST_APPOINTMENT]",
        "See a doctor.\n🏥 ",
        true
    )]
    #[case("[SUGGEST_APPOINTMENT]a[SUGGEST_APPOINTMENT]", "a", true)]
    #[case("[SUGGEST_APPOINTMENT", "[SUGGEST_APPOINTMENT", false)]
    #[case("", "", false)]
    fn test_marker_processing(
        #[case] raw: &str,
        #[case] expected: &str,
        #[case] suggest: bool,
    ) {
        let reply = ChatReply::from_text(raw);
        assert_eq!(reply.response, expected);
        assert_eq!(reply.suggest_appointment, suggest);
    }
}
