use anyhow::{Result, anyhow};
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::backend::ClipboardBackend;
use super::content::{ClipContent, Target};

/// In-memory backend for tests
/// Writes replace the whole buffer content, like a real clipboard offer,
/// and are counted so tests can assert that no write-back happened.
/// Clones share the same buffers, so a test can keep a handle while the
/// app owns the boxed backend
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    buffers: Mutex<HashMap<Target, ClipContent>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend::default()
    }

    pub fn with_text(target: Target, text: &str) -> Self {
        let backend = FakeBackend::new();
        backend.set(target, ClipContent::from_text(text));
        backend
    }

    pub fn with_image(target: Target, image: RgbaImage) -> Self {
        let backend = FakeBackend::new();
        backend.set(target, ClipContent::from_image(image));
        backend
    }

    /// Seed a buffer without counting it as a write
    pub fn set(&self, target: Target, content: ClipContent) {
        self.inner.buffers.lock().unwrap().insert(target, content);
    }

    pub fn text_of(&self, target: Target) -> Option<String> {
        self.inner
            .buffers
            .lock()
            .unwrap()
            .get(&target)
            .and_then(|c| c.text.clone())
    }

    pub fn image_of(&self, target: Target) -> Option<RgbaImage> {
        self.inner
            .buffers
            .lock()
            .unwrap()
            .get(&target)
            .and_then(|c| c.image.clone())
    }

    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl ClipboardBackend for FakeBackend {
    fn read(&self, target: Target) -> Result<ClipContent> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("injected read failure"));
        }
        Ok(self
            .inner
            .buffers
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or_default())
    }

    fn write_text(&self, target: Target, text: &str) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("injected write failure"));
        }
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.set(target, ClipContent::from_text(text));
        Ok(())
    }

    fn write_image(&self, target: Target, image: &RgbaImage) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("injected write failure"));
        }
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.set(target, ClipContent::from_image(image.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}
