use crate::presentation::audio::{
    fanfare_line, PlaybackOutcome, Soundtrack, BLOCKED_AUDIO_HINT, MISSING_AUDIO_HINT,
};
use crate::presentation::confetti::{spawn_confetti, ConfettiSettings};
use crate::presentation::{Mode, Presenter, Screen};
use crate::utils::error::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::process::Child;
use tokio::task::JoinHandle;

/// Cloneable writer so the confetti task and the presenter share one sink.
#[derive(Clone)]
pub struct SharedOutput {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedOutput {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output lock poisoned"))?;
        inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output lock poisoned"))?;
        inner.flush()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentationSettings {
    pub seed: Option<u64>,
    pub confetti: ConfettiSettings,
    pub soundtrack: Option<Soundtrack>,
}

impl PresentationSettings {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Mutable presentation state. Never shared with the decision engine.
#[derive(Default)]
pub struct PresentationState {
    confetti: Option<JoinHandle<usize>>,
    player: Option<Child>,
    audio_ready: bool,
}

impl PresentationState {
    pub fn start_confetti(&mut self, handle: JoinHandle<usize>) {
        self.stop_confetti();
        self.confetti = Some(handle);
    }

    pub fn stop_confetti(&mut self) {
        if let Some(handle) = self.confetti.take() {
            handle.abort();
        }
    }

    pub fn confetti_running(&self) -> bool {
        self.confetti.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn audio_ready(&self) -> bool {
        self.audio_ready
    }

    fn mark_audio_ready(&mut self, player: Child) {
        self.audio_ready = true;
        self.player = Some(player);
    }

    fn mark_audio_failed(&mut self) {
        self.audio_ready = false;
        self.player = None;
    }
}

pub struct TerminalPresenter {
    settings: PresentationSettings,
    rng: StdRng,
    out: SharedOutput,
    state: PresentationState,
}

impl TerminalPresenter {
    pub fn new(settings: PresentationSettings, rng: StdRng, out: SharedOutput) -> Self {
        Self {
            settings,
            rng,
            out,
            state: PresentationState::default(),
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    fn write_screen(&mut self, screen: &Screen) -> Result<()> {
        let color = match screen.mode {
            Mode::Yes => "\x1b[1;93m",
            Mode::No => "\x1b[1;91m",
        };
        writeln!(self.out)?;
        writeln!(self.out, "  {}{}\x1b[0m", color, screen.headline)?;
        writeln!(self.out, "  {}", screen.subtext)?;
        writeln!(self.out)?;
        writeln!(self.out, "  \x1b[2m{}\x1b[0m", screen.debug_date)?;
        writeln!(self.out, "  \x1b[2m{}\x1b[0m", screen.debug_timezone)?;
        self.out.flush()?;
        Ok(())
    }

    fn start_confetti(&mut self) {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        let handle = spawn_confetti(self.settings.confetti, rng, self.out.clone());
        self.state.start_confetti(handle);
        tracing::debug!("🎉 Confetti started");
    }

    async fn setup_audio(&mut self) -> Result<()> {
        if self.state.audio_ready {
            return Ok(());
        }
        let Some(soundtrack) = self.settings.soundtrack.clone() else {
            tracing::debug!("Audio disabled");
            return Ok(());
        };

        match soundtrack.play().await {
            PlaybackOutcome::Playing(child) => self.state.mark_audio_ready(child),
            PlaybackOutcome::Fanfare => {
                writeln!(self.out, "  {}", MISSING_AUDIO_HINT)?;
                writeln!(self.out, "  {}", fanfare_line())?;
            }
            PlaybackOutcome::Blocked { hint } => {
                writeln!(self.out, "  {}", hint)?;
            }
        }
        Ok(())
    }

    /// Waits for the confetti stream and the player to end.
    ///
    /// A player that exits unsuccessfully counts as blocked playback.
    async fn finish(&mut self) -> Result<()> {
        if let Some(handle) = self.state.confetti.take() {
            match handle.await {
                Ok(drawn) => tracing::debug!("Confetti finished after {} pieces", drawn),
                Err(e) if e.is_cancelled() => tracing::debug!("Confetti cancelled"),
                Err(e) => tracing::warn!("Confetti task failed: {}", e),
            }
        }

        if let Some(mut player) = self.state.player.take() {
            let played = match player.wait().await {
                Ok(status) if status.success() => {
                    tracing::debug!("Audio finished");
                    true
                }
                Ok(status) => {
                    tracing::warn!("Audio player exited with {}", status);
                    false
                }
                Err(e) => {
                    tracing::warn!("Audio player could not be awaited: {}", e);
                    false
                }
            };

            if !played {
                self.state.mark_audio_failed();
                writeln!(self.out, "  {}", BLOCKED_AUDIO_HINT)?;
                self.out.flush()?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn present(&mut self, screen: &Screen) -> Result<()> {
        self.write_screen(screen)?;

        match screen.mode {
            Mode::Yes => {
                self.start_confetti();
                self.setup_audio().await?;
            }
            Mode::No => self.state.stop_confetti(),
        }

        self.finish().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{HEADLINE_NO, HEADLINE_YES, NOT_TODAY_MESSAGE};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn screen(mode: Mode) -> Screen {
        Screen {
            mode,
            headline: match mode {
                Mode::Yes => HEADLINE_YES.to_string(),
                Mode::No => HEADLINE_NO.to_string(),
            },
            subtext: NOT_TODAY_MESSAGE.to_string(),
            debug_date: "Fecha en Colombia: 2024-07-20".to_string(),
            debug_timezone: "Zona horaria: America/Bogota".to_string(),
        }
    }

    fn quick_settings(soundtrack: Option<Soundtrack>) -> PresentationSettings {
        PresentationSettings {
            seed: Some(9),
            confetti: ConfettiSettings {
                initial_burst: 3,
                interval: Duration::from_millis(5),
                duration: Duration::from_millis(20),
            },
            soundtrack,
        }
    }

    #[tokio::test]
    async fn test_no_mode_writes_screen_without_confetti() {
        let buffer = Buffer::default();
        let settings = quick_settings(None);
        let rng = settings.rng();
        let mut presenter = TerminalPresenter::new(settings, rng, SharedOutput::new(buffer.clone()));

        presenter.present(&screen(Mode::No)).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains("NO"));
        assert!(out.contains("Fecha en Colombia: 2024-07-20"));
        assert!(out.contains("Zona horaria: America/Bogota"));
        assert!(!out.contains('♪'));
        assert!(!presenter.state().confetti_running());
    }

    #[tokio::test]
    async fn test_yes_mode_without_audio_file_plays_fanfare() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = Buffer::default();
        let settings = quick_settings(Some(Soundtrack::new(dir.path().join("missing.mp3"), "mpv", vec![])));
        let rng = settings.rng();
        let mut presenter = TerminalPresenter::new(settings, rng, SharedOutput::new(buffer.clone()));

        presenter.present(&screen(Mode::Yes)).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains("SÍ"));
        assert!(out.contains(MISSING_AUDIO_HINT));
        assert!(out.contains("C5 (523.25 Hz)"));
        assert!(!presenter.state().audio_ready());
        assert!(!presenter.state().confetti_running());
    }

    #[tokio::test]
    async fn test_restarting_confetti_aborts_previous_stream() {
        let mut state = PresentationState::default();
        let long = ConfettiSettings {
            initial_burst: 0,
            interval: Duration::from_millis(10),
            duration: Duration::from_secs(60),
        };
        let first = spawn_confetti(long, StdRng::seed_from_u64(1), io::sink());
        let first_abort = first.abort_handle();
        state.start_confetti(first);
        assert!(state.confetti_running());

        let second = spawn_confetti(long, StdRng::seed_from_u64(2), io::sink());
        let second_abort = second.abort_handle();
        state.start_confetti(second);
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(first_abort.is_finished());
        assert!(!second_abort.is_finished());

        state.stop_confetti();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(second_abort.is_finished());
        assert!(!state.confetti_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_player_exiting_non_zero_shows_retry_hint() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let buffer = Buffer::default();
        let settings = quick_settings(Some(Soundtrack::new(file.path(), "false", vec![])));
        let rng = settings.rng();
        let mut presenter = TerminalPresenter::new(settings, rng, SharedOutput::new(buffer.clone()));

        presenter.present(&screen(Mode::Yes)).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains(BLOCKED_AUDIO_HINT));
        assert!(!out.contains(MISSING_AUDIO_HINT));
        assert!(!presenter.state().audio_ready());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_player_exiting_cleanly_keeps_audio_ready() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let buffer = Buffer::default();
        let settings = quick_settings(Some(Soundtrack::new(file.path(), "true", vec![])));
        let rng = settings.rng();
        let mut presenter = TerminalPresenter::new(settings, rng, SharedOutput::new(buffer.clone()));

        presenter.present(&screen(Mode::Yes)).await.unwrap();

        assert!(!buffer.contents().contains(BLOCKED_AUDIO_HINT));
        assert!(presenter.state().audio_ready());
    }
}
