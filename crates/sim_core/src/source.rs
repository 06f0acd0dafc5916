use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use shared::domain::ColorHint;

use crate::{GeneratedMessage, MessageSource};

const NAME_PREFIXES: &[&str] = &[
    "Pixel", "Turbo", "Cosmic", "Sleepy", "Neon", "Captain", "Lucky", "Silent", "Mega", "Frosty",
    "Shadow", "Crispy", "Retro", "Salty", "Wild", "Quantum",
];

const NAME_SUFFIXES: &[&str] = &[
    "Panda", "Gamer", "Wizard", "Otter", "Llama", "Ninja", "Potato", "Falcon", "Noodle", "Badger",
    "Goblin", "Toaster", "Viking", "Pickle", "Raccoon", "Comet",
];

const PHRASES: &[&str] = &[
    "LOL",
    "first!",
    "this is insane",
    "no way that just happened",
    "GG",
    "hello from Brazil",
    "can we get a W in the chat",
    "W",
    "clip it!!",
    "what did I just watch",
    "hype hype hype",
    "love this stream",
    "KEKW",
    "is this live?",
    "lets gooo",
    "who else is here from the trailer",
    "chat is moving so fast nobody will see this",
    "big if true",
    "that was clean",
    "F",
    "5Head play",
    "just got here, what did I miss?",
    "POG",
    "mods?",
];

/// Random user names, chat phrases and label colors.
pub struct RandomMessageSource {
    rng: StdRng,
}

impl RandomMessageSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn user_name(&mut self) -> String {
        let prefix = NAME_PREFIXES.choose(&mut self.rng).copied().unwrap_or("Anon");
        let suffix = NAME_SUFFIXES.choose(&mut self.rng).copied().unwrap_or("User");
        let number: u16 = self.rng.gen_range(1..1000);
        format!("{prefix}{suffix}{number}")
    }

    fn phrase(&mut self) -> String {
        PHRASES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("hi")
            .to_string()
    }

    fn color(&mut self) -> ColorHint {
        let value: u32 = self.rng.gen_range(0..=0xFF_FFFF);
        ColorHint::new(format!("#{value:06x}"))
    }
}

impl Default for RandomMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSource for RandomMessageSource {
    fn next(&mut self) -> GeneratedMessage {
        GeneratedMessage {
            user_name: self.user_name(),
            text: self.phrase(),
            color: self.color(),
        }
    }
}
