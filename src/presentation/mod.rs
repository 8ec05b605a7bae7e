//! Presentation layer.
//!
//! Everything here consumes a [`Verdict`] and never looks at the clock. All
//! mutable state (confetti task, audio readiness) lives in
//! [`terminal::PresentationState`], owned by the presenter.

pub mod audio;
pub mod confetti;
pub mod terminal;

use crate::domain::model::Verdict;
use crate::utils::error::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

pub const HEADLINE_YES: &str = "SÍ";
pub const HEADLINE_NO: &str = "NO";
pub const NOT_TODAY_MESSAGE: &str = "Hoy no es. Vuelva el 20 de julio, patriota de teclado.";

pub const PATRIOTIC_MESSAGES: [&str; 5] = [
    "LA PATRIA LLAMA. HOY SÍ, MIJO.",
    "Hoy sí toca respetar la arepa.",
    "A izar la bandera y a cantar duro (sin hacerle el feo al vecino).",
    "Cafecito en mano, himno en el corazón.",
    "Modo ultracolombiano activado. Hágale pues.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Yes,
    No,
}

/// Text shown for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub mode: Mode,
    pub headline: String,
    pub subtext: String,
    pub debug_date: String,
    pub debug_timezone: String,
}

impl Screen {
    pub fn from_verdict<R: Rng + ?Sized>(verdict: &Verdict, rng: &mut R) -> Self {
        let (mode, headline, subtext) = if verdict.celebrate {
            (Mode::Yes, HEADLINE_YES, pick_patriotic_message(rng))
        } else {
            (Mode::No, HEADLINE_NO, NOT_TODAY_MESSAGE)
        };

        Self {
            mode,
            headline: headline.to_string(),
            subtext: subtext.to_string(),
            debug_date: format!("Fecha en Colombia: {}", verdict.calendar_date),
            debug_timezone: format!("Zona horaria: {}", verdict.timezone),
        }
    }
}

pub fn pick_patriotic_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PATRIOTIC_MESSAGES
        .choose(rng)
        .copied()
        .unwrap_or(PATRIOTIC_MESSAGES[0])
}

#[async_trait]
pub trait Presenter: Send {
    async fn present(&mut self, screen: &Screen) -> Result<()>;
}
