// Decodes an overlay image off the host thread and hands it over when ready.
// The surface polls the subscription once per frame; dropping the
// subscription detaches from the loader (a late result is simply discarded).

use crate::error::{Error, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// What an image provider can tell the surface.
#[derive(Debug)]
pub enum ImageEvent {
    Ready(RgbaImage),
    Failed(Error),
}

/// Receiving end of an image provider. May deliver more than once if the
/// provider's source changes.
#[derive(Debug)]
pub struct ImageSubscription {
    rx: Receiver<ImageEvent>,
    closed: bool,
}

impl ImageSubscription {
    /// A subscription plus the sender a custom provider pushes into.
    pub fn channel() -> (Sender<ImageEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx, closed: false })
    }

    /// Decode `path` on a background thread.
    pub fn load_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, sub) = Self::channel();
        let spawned = thread::Builder::new().name("overlay-image".into()).spawn({
            let tx = tx.clone();
            let path = path.clone();
            move || {
                let event = match decode_file(&path) {
                    Ok(img) => ImageEvent::Ready(img),
                    Err(e) => ImageEvent::Failed(e),
                };
                // Receiver gone = the surface was disposed; nothing to do.
                let _ = tx.send(event);
            }
        });
        if let Err(e) = spawned {
            let _ = tx.send(ImageEvent::Failed(Error::ImageLoad(format!("spawn loader: {e}"))));
        }
        tracing::debug!(path = %path.display(), "overlay image requested");
        sub
    }

    /// Non-blocking: the next notification, if one has arrived.
    pub fn poll(&mut self) -> Option<ImageEvent> {
        if self.closed {
            return None;
        }
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    /// True once every provider has hung up and nothing more can arrive.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Read + decode an image file into RGBA8.
pub fn decode_file(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| Error::ImageLoad(format!("{}: {}", path.display(), e)))?;
    decode_bytes(&bytes).map_err(|e| match e {
        Error::ImageLoad(msg) => Error::ImageLoad(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Decode in-memory encoded bytes (PNG, JPEG, ...) into RGBA8.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::{Duration, Instant};

    fn wait(sub: &mut ImageSubscription) -> Option<ImageEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(e) = sub.poll() {
                return Some(e);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (tx, mut sub) = ImageSubscription::channel();
        assert!(sub.poll().is_none());
        tx.send(ImageEvent::Ready(RgbaImage::new(1, 1))).unwrap();
        tx.send(ImageEvent::Ready(RgbaImage::new(2, 2))).unwrap();
        assert!(matches!(sub.poll(), Some(ImageEvent::Ready(i)) if i.width() == 1));
        assert!(matches!(sub.poll(), Some(ImageEvent::Ready(i)) if i.width() == 2));
        drop(tx);
        assert!(sub.poll().is_none());
        assert!(sub.is_closed());
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let mut sub = ImageSubscription::load_file("definitely/not/here.png");
        assert!(matches!(wait(&mut sub), Some(ImageEvent::Failed(Error::ImageLoad(_)))));
    }

    #[test]
    fn test_loads_png_from_disk() {
        let path = std::env::temp_dir().join(format!("scratch-card-{}.png", std::process::id()));
        RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255])).save(&path).unwrap();
        let mut sub = ImageSubscription::load_file(&path);
        let event = wait(&mut sub);
        let _ = std::fs::remove_file(&path);
        match event {
            Some(ImageEvent::Ready(img)) => assert_eq!(img.dimensions(), (3, 2)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_file_names_the_path() {
        let path = std::env::temp_dir().join(format!("scratch-card-{}.txt", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();
        let err = decode_file(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        match err {
            Error::ImageLoad(msg) => assert!(msg.starts_with(&path.display().to_string()), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage_bytes() {
        assert!(decode_bytes(b"not an image").is_err());
    }
}
