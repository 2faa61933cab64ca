//! In-process audio playback using rodio.
//!
//! Available with the `native-audio` feature. Unlike the external players
//! this one blocks until playback ends, because the output stream stops
//! when the player is dropped.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::AlertError;

/// Mechanism name used in chains and dispatch reports.
pub const MECHANISM_NAME: &str = "rodio";

/// A player bound to the default audio output device.
pub struct NativePlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl NativePlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::MechanismUnavailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, AlertError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AlertError::MechanismUnavailable(MECHANISM_NAME.to_string(), e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Decodes and plays `path`, returning when playback has finished.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::PlaybackFailed` if the file cannot be opened or
    /// decoded, or no sink can be created.
    pub fn play_audio_file(&self, path: &Path) -> Result<(), AlertError> {
        let failed = |e: String| AlertError::PlaybackFailed(MECHANISM_NAME.to_string(), e);

        let file = File::open(path).map_err(|e| failed(format!("{}: {}", path.display(), e)))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| failed(e.to_string()))?;
        let sink = Sink::try_new(&self.stream_handle).map_err(|e| failed(e.to_string()))?;

        sink.append(decoder);
        sink.sleep_until_end();

        debug!("Native playback finished: {}", path.display());
        Ok(())
    }
}

impl std::fmt::Debug for NativePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativePlayer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests may run without audio hardware (e.g. CI containers) and
    // return early when no device is available.

    #[test]
    fn test_missing_file_fails_playback() {
        let player = match NativePlayer::new() {
            Ok(p) => p,
            Err(e) => {
                assert!(e.is_unavailable());
                return;
            }
        };

        let err = player
            .play_audio_file(Path::new("/nonexistent/path/to/sound.wav"))
            .unwrap_err();
        assert!(matches!(err, AlertError::PlaybackFailed(_, _)));
    }

    #[test]
    fn test_undecodable_file_fails_playback() {
        let player = match NativePlayer::new() {
            Ok(p) => p,
            Err(_) => return,
        };

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not audio").unwrap();
        assert!(player.play_audio_file(file.path()).is_err());
    }

    #[test]
    fn test_debug_impl() {
        if let Ok(player) = NativePlayer::new() {
            assert!(format!("{:?}", player).contains("NativePlayer"));
        }
    }
}
