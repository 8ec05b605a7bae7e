use rand::rngs::StdRng;
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const FIELD_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiColor {
    Yellow,
    Blue,
    Red,
    White,
}

impl ConfettiColor {
    pub const PALETTE: [ConfettiColor; 4] = [
        ConfettiColor::Yellow,
        ConfettiColor::Blue,
        ConfettiColor::Red,
        ConfettiColor::White,
    ];

    fn ansi(&self) -> &'static str {
        match self {
            ConfettiColor::Yellow => "\x1b[93m",
            ConfettiColor::Blue => "\x1b[94m",
            ConfettiColor::Red => "\x1b[91m",
            ConfettiColor::White => "\x1b[97m",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiPiece {
    pub color: ConfettiColor,
    /// Horizontal position, `[0, 100)` percent of the field.
    pub left_percent: f64,
    /// Fall duration in seconds, `[2.5, 3.5)`.
    pub fall_seconds: f64,
    /// Rotation in degrees, `[0, 360)`.
    pub rotation_deg: f64,
}

impl ConfettiPiece {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let color = ConfettiColor::PALETTE[rng.gen_range(0..ConfettiColor::PALETTE.len())];
        Self {
            color,
            left_percent: rng.gen_range(0.0..100.0),
            fall_seconds: 2.5 + rng.gen::<f64>(),
            rotation_deg: rng.gen_range(0.0..360.0),
        }
    }

    fn glyph(&self) -> char {
        match (self.rotation_deg / 45.0) as u32 % 4 {
            0 => '|',
            1 => '/',
            2 => '-',
            _ => '\\',
        }
    }

    /// One terminal line with the piece at its column.
    pub fn render(&self) -> String {
        let column = ((self.left_percent / 100.0) * FIELD_WIDTH as f64) as usize;
        format!(
            "{}{}{}\x1b[0m",
            " ".repeat(column.min(FIELD_WIDTH - 1)),
            self.color.ansi(),
            self.glyph()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfettiSettings {
    pub initial_burst: usize,
    pub interval: Duration,
    pub duration: Duration,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            initial_burst: 20,
            interval: Duration::from_millis(180),
            duration: Duration::from_secs(6),
        }
    }
}

/// Streams pieces to `out` until `settings.duration` has elapsed.
///
/// Resolves to the number of pieces drawn. Aborting the handle stops the stream.
pub fn spawn_confetti<W>(settings: ConfettiSettings, mut rng: StdRng, mut out: W) -> JoinHandle<usize>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        let started = Instant::now();
        let mut drawn = 0usize;

        for _ in 0..settings.initial_burst {
            if writeln!(out, "{}", ConfettiPiece::random(&mut rng).render()).is_err() {
                return drawn;
            }
            drawn += 1;
        }

        let mut ticker = time::interval_at(started + settings.interval, settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while started.elapsed() < settings.duration {
            ticker.tick().await;
            if started.elapsed() >= settings.duration {
                break;
            }
            if writeln!(out, "{}", ConfettiPiece::random(&mut rng).render()).is_err() {
                tracing::debug!("Confetti output closed after {} pieces", drawn);
                break;
            }
            drawn += 1;
        }

        let _ = out.flush();
        drawn
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn bytes(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pieces_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let piece = ConfettiPiece::random(&mut rng);
            assert!((0.0..100.0).contains(&piece.left_percent));
            assert!((2.5..3.5).contains(&piece.fall_seconds));
            assert!((0.0..360.0).contains(&piece.rotation_deg));
            assert!(ConfettiColor::PALETTE.contains(&piece.color));
        }
    }

    #[test]
    fn test_render_places_glyph_inside_field() {
        let piece = ConfettiPiece {
            color: ConfettiColor::Red,
            left_percent: 99.9,
            fall_seconds: 3.0,
            rotation_deg: 100.0,
        };
        let line = piece.render();
        assert!(line.starts_with(&" ".repeat(FIELD_WIDTH - 1)));
        assert!(line.contains('-'));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[tokio::test]
    async fn test_stream_emits_burst_then_stops() {
        let settings = ConfettiSettings {
            initial_burst: 5,
            interval: Duration::from_millis(10),
            duration: Duration::from_millis(60),
        };
        let drawn = spawn_confetti(settings, StdRng::seed_from_u64(3), std::io::sink())
            .await
            .unwrap();
        assert!(drawn > 5);
    }

    #[tokio::test]
    async fn test_zero_duration_emits_only_the_burst() {
        let settings = ConfettiSettings {
            initial_burst: 4,
            interval: Duration::from_millis(10),
            duration: Duration::ZERO,
        };
        let drawn = spawn_confetti(settings, StdRng::seed_from_u64(3), std::io::sink())
            .await
            .unwrap();
        assert_eq!(drawn, 4);
    }

    #[tokio::test]
    async fn test_seeded_burst_is_byte_identical() {
        let settings = ConfettiSettings {
            initial_burst: 25,
            interval: Duration::from_millis(10),
            duration: Duration::ZERO,
        };

        let first = Capture::default();
        let second = Capture::default();
        let other_seed = Capture::default();
        spawn_confetti(settings, StdRng::seed_from_u64(720), first.clone()).await.unwrap();
        spawn_confetti(settings, StdRng::seed_from_u64(720), second.clone()).await.unwrap();
        spawn_confetti(settings, StdRng::seed_from_u64(721), other_seed.clone()).await.unwrap();

        assert!(!first.bytes().is_empty());
        assert_eq!(first.bytes(), second.bytes());
        assert_ne!(first.bytes(), other_seed.bytes());
        assert_eq!(String::from_utf8(first.bytes()).unwrap().lines().count(), 25);
    }

    #[tokio::test]
    async fn test_no_piece_drawn_after_duration() {
        // The first tick lands after the duration has already run out.
        let settings = ConfettiSettings {
            initial_burst: 2,
            interval: Duration::from_millis(50),
            duration: Duration::from_millis(10),
        };
        let drawn = spawn_confetti(settings, StdRng::seed_from_u64(3), std::io::sink())
            .await
            .unwrap();
        assert_eq!(drawn, 2);
    }
}
