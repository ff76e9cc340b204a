//! Slash-command classification and interpretation.

use super::transform::TextTransformer;
use crate::error::HandlerError;
use crate::state::{Mode, Session};
use chatrelay_proto::ChatMessage;
use rand::Rng;
use std::fmt;

/// Author of every command feedback line.
pub const SYSTEM_USERNAME: &str = "System";

/// What an inbound chat line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/flipcoin`
    CoinFlip,
    /// `/obnoxious`
    ToggleObnoxious,
    /// `/misspell`
    ToggleMisspell,
    /// Anything else.
    NormalText,
}

impl Command {
    /// Classify raw inbound text. Only exact matches count: no trimming and
    /// no case folding.
    pub fn classify(text: &str) -> Self {
        match text {
            "/flipcoin" => Self::CoinFlip,
            "/obnoxious" => Self::ToggleObnoxious,
            "/misspell" => Self::ToggleMisspell,
            _ => Self::NormalText,
        }
    }

    /// Static label for metrics.
    pub fn name(self) -> &'static str {
        match self {
            Self::CoinFlip => "flipcoin",
            Self::ToggleObnoxious => "obnoxious",
            Self::ToggleMisspell => "misspell",
            Self::NormalText => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    fn flip<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Tails
        } else {
            Self::Heads
        }
    }
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Heads => "Heads",
            Self::Tails => "Tails",
        })
    }
}

/// Turns inbound chat text into the outbound line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInterpreter {
    transformer: TextTransformer,
}

impl CommandInterpreter {
    pub fn new(transformer: TextTransformer) -> Self {
        Self { transformer }
    }

    /// Interpret `text` sent by `session`, returning how it was classified
    /// along with the outbound line.
    ///
    /// Mode toggles mutate the session. The session must have joined.
    pub fn interpret<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        text: &str,
        rng: &mut R,
    ) -> Result<(Command, ChatMessage), HandlerError> {
        let username = session.require_username()?.to_string();

        let command = Command::classify(text);
        let feedback = match command {
            Command::NormalText => {
                let message = self.transformer.apply(session.modes(), text, rng);
                return Ok((command, ChatMessage::new(username, message)));
            }
            Command::CoinFlip => format!("flips coin: gets {}!", CoinFace::flip(rng)),
            Command::ToggleObnoxious => toggle(session, Mode::Obnoxious),
            Command::ToggleMisspell => toggle(session, Mode::Misspell),
        };

        let message = ChatMessage::new(SYSTEM_USERNAME, format!("User @{username} {feedback}"));
        Ok((command, message))
    }
}

fn toggle(session: &mut Session, mode: Mode) -> String {
    session.modes_mut().toggle(mode);
    format!("toggles /{} mode", mode.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnectionRegistry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn joined(username: &str) -> Session {
        let mut registry = ConnectionRegistry::default();
        let mut session = Session::new("001AAAAAA".to_string());
        session.join(&mut registry, username.to_string()).unwrap();
        session
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn classify_exact_literals_only() {
        assert_eq!(Command::classify("/flipcoin"), Command::CoinFlip);
        assert_eq!(Command::classify("/obnoxious"), Command::ToggleObnoxious);
        assert_eq!(Command::classify("/misspell"), Command::ToggleMisspell);

        for text in [
            " /flipcoin",
            "/flipcoin ",
            "/FlipCoin",
            "/flipcoins",
            "flipcoin",
            "/misspell\n",
            "/obnox",
            "",
            "/",
            "hello",
        ] {
            assert_eq!(Command::classify(text), Command::NormalText, "{text:?}");
        }
    }

    #[test]
    fn normal_text_is_attributed_to_sender() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("alice");
        let out = interpreter.interpret(&mut session, "hello", &mut rng()).unwrap().1;
        assert_eq!(out, ChatMessage::new("alice", "hello"));
    }

    #[test]
    fn obnoxious_toggle_then_text() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("alice");
        let mut rng = rng();

        let feedback = interpreter.interpret(&mut session, "/obnoxious", &mut rng).unwrap().1;
        assert_eq!(
            feedback,
            ChatMessage::new("System", "User @alice toggles /obnoxious mode")
        );
        assert!(session.modes().obnoxious);

        let out = interpreter.interpret(&mut session, "hello", &mut rng).unwrap().1;
        assert_eq!(out.message, "hello, ay?");
    }

    #[test]
    fn misspell_toggle_then_text() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("alice");
        let mut rng = rng();

        let feedback = interpreter.interpret(&mut session, "/misspell", &mut rng).unwrap().1;
        assert_eq!(feedback.message, "User @alice toggles /misspell mode");

        let out = interpreter.interpret(&mut session, "testing", &mut rng).unwrap().1;
        assert_eq!(out.username, "alice");
        assert_eq!(out.message.len(), 7);
        assert!(out.message.starts_with('t') && out.message.ends_with('g'));
        let mut middle: Vec<char> = out.message[1..6].chars().collect();
        middle.sort_unstable();
        assert_eq!(middle, vec!['e', 'i', 'n', 's', 't']);
    }

    #[test]
    fn toggling_twice_restores_modes() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("bob");
        let mut rng = rng();
        let before = session.modes();

        for command in ["/obnoxious", "/misspell"] {
            interpreter.interpret(&mut session, command, &mut rng).unwrap();
            interpreter.interpret(&mut session, command, &mut rng).unwrap();
        }
        assert_eq!(session.modes(), before);

        let out = interpreter.interpret(&mut session, "plain", &mut rng).unwrap().1;
        assert_eq!(out.message, "plain");
    }

    #[test]
    fn coin_flip_is_system_message_with_heads_or_tails() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("carol");
        let mut rng = rng();
        let before = session.modes();

        for _ in 0..20 {
            let out = interpreter.interpret(&mut session, "/flipcoin", &mut rng).unwrap().1;
            assert_eq!(out.username, SYSTEM_USERNAME);
            assert!(
                out.message == "User @carol flips coin: gets Heads!"
                    || out.message == "User @carol flips coin: gets Tails!",
                "{}",
                out.message
            );
        }
        assert_eq!(session.modes(), before);
    }

    #[test]
    fn coin_flip_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 10_000;
        let heads = (0..trials)
            .filter(|_| CoinFace::flip(&mut rng) == CoinFace::Heads)
            .count();
        // 5 standard deviations at n = 10_000 is 250.
        assert!((4750..=5250).contains(&heads), "heads = {heads}");
    }

    #[test]
    fn commands_are_not_transformed() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("dave");
        let mut rng = rng();
        interpreter.interpret(&mut session, "/obnoxious", &mut rng).unwrap();

        let out = interpreter.interpret(&mut session, "/obnoxious", &mut rng).unwrap().1;
        assert_eq!(out.message, "User @dave toggles /obnoxious mode");
        assert!(!session.modes().obnoxious);
    }

    #[test]
    fn interpret_reports_classification() {
        let interpreter = CommandInterpreter::default();
        let mut session = joined("erin");
        let mut rng = rng();
        for (text, expected) in [
            ("/flipcoin", Command::CoinFlip),
            ("/obnoxious", Command::ToggleObnoxious),
            ("/misspell", Command::ToggleMisspell),
            ("hi", Command::NormalText),
        ] {
            let (command, _) = interpreter.interpret(&mut session, text, &mut rng).unwrap();
            assert_eq!(command, expected, "{text:?}");
        }
    }

    #[test]
    fn interpret_requires_join() {
        let interpreter = CommandInterpreter::default();
        let mut session = Session::new("001AAAAAB".to_string());
        let err = interpreter
            .interpret(&mut session, "/flipcoin", &mut rng())
            .unwrap_err();
        assert_eq!(err, HandlerError::NotJoined);
    }
}
