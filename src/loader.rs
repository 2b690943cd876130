use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use log::warn;

/// Delay before the single decode retry.
pub const DECODE_RETRY_DELAY: Duration = Duration::from_millis(250);
/// Total decode attempts (first try plus one retry).
pub const MAX_DECODE_ATTEMPTS: u32 = 2;

/// Spacing between surface-readiness checks.
pub const SURFACE_RETRY_DELAY: Duration = Duration::from_millis(40);
/// Readiness checks before the surface is declared unavailable.
pub const MAX_SURFACE_ATTEMPTS: u32 = 25;

/// Cooperative background decode. The session calls [`poll`] from the
/// host's event loop; no threads are involved, and a session that has
/// ended simply stops polling (the loader holds no external state to
/// clean up).
///
/// Decode failures get one retry after a short fixed delay, then the
/// error is terminal.
///
/// [`poll`]: BackgroundLoader::poll
#[derive(Debug)]
pub struct BackgroundLoader {
    bytes: Vec<u8>,
    attempts: u32,
    retry_at: Option<Instant>,
}

pub enum LoadPoll {
    /// Waiting for the retry delay to elapse.
    Pending,
    Ready(Arc<RgbaImage>),
    Failed(image::ImageError),
}

impl BackgroundLoader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            attempts: 0,
            retry_at: None,
        }
    }

    pub fn poll(&mut self, now: Instant) -> LoadPoll {
        if let Some(retry_at) = self.retry_at {
            if now < retry_at {
                return LoadPoll::Pending;
            }
        }

        match image::load_from_memory(&self.bytes) {
            Ok(decoded) => LoadPoll::Ready(Arc::new(decoded.to_rgba8())),
            Err(err) => {
                self.attempts += 1;
                if self.attempts >= MAX_DECODE_ATTEMPTS {
                    LoadPoll::Failed(err)
                } else {
                    warn!("background decode failed (attempt {}), retrying: {err}", self.attempts);
                    self.retry_at = Some(now + DECODE_RETRY_DELAY);
                    LoadPoll::Pending
                }
            }
        }
    }
}

/// Bounded wait for the host to attach its drawing surface. Each poll
/// spaced by [`SURFACE_RETRY_DELAY`] counts one attempt; after
/// [`MAX_SURFACE_ATTEMPTS`] the wait is over and the session surfaces a
/// terminal error.
#[derive(Debug)]
pub struct SurfaceProbe {
    attempts: u32,
    next_check: Option<Instant>,
}

pub enum SurfacePoll {
    Waiting,
    Exhausted { attempts: u32 },
}

impl Default for SurfaceProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceProbe {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            next_check: None,
        }
    }

    pub fn poll(&mut self, now: Instant) -> SurfacePoll {
        if let Some(next_check) = self.next_check {
            if now < next_check {
                return SurfacePoll::Waiting;
            }
        }
        self.attempts += 1;
        if self.attempts >= MAX_SURFACE_ATTEMPTS {
            SurfacePoll::Exhausted {
                attempts: self.attempts,
            }
        } else {
            self.next_check = Some(now + SURFACE_RETRY_DELAY);
            SurfacePoll::Waiting
        }
    }
}
