//! Test doubles shared by unit tests

#![allow(clippy::expect_used)]

use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::digest::{Accumulator, Algorithm};
use crate::vfs::{DirEntry, FileInfo, MemFs, Vfs, VfsFile};

/// Known digests of the fixture tree built by [`fixture_fs`]
pub(crate) const FIXTURE_MD5: [(&str, &str); 4] = [
    ("folder1/file.txt", "d41d8cd98f00b204e9800998ecf8427e"),
    ("folder1/folder2/file2.txt", "d41d8cd98f00b204e9800998ecf8427e"),
    ("folder1/folder2/abc.txt", "900150983cd24fb0d6963f7d28e17f72"),
    ("hello.txt", "5d41402abc4b2a76b9719d911017c592"),
];

/// Four regular files spread over nested directories
pub(crate) fn fixture_fs() -> MemFs {
    let mut fs = MemFs::new();
    fs.insert("folder1/file.txt", "").expect("insert");
    fs.insert("folder1/folder2/file2.txt", "").expect("insert");
    fs.insert("folder1/folder2/abc.txt", "abc").expect("insert");
    fs.insert("hello.txt", "hello").expect("insert");
    fs
}

/// Counts opens and bytes read through the wrapped filesystem
#[derive(Default)]
pub(crate) struct CountingFs {
    inner: MemFs,
    pub(crate) opens: Arc<AtomicUsize>,
    pub(crate) bytes_read: Arc<AtomicUsize>,
}

impl CountingFs {
    pub(crate) fn new(inner: MemFs) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn bytes_read(&self) -> usize {
        self.bytes_read.load(Ordering::SeqCst)
    }
}

struct CountingFile {
    inner: Box<dyn VfsFile>,
    bytes_read: Arc<AtomicUsize>,
}

impl Read for CountingFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read.fetch_add(n, Ordering::SeqCst);
        Ok(n)
    }
}

impl VfsFile for CountingFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        self.inner.metadata()
    }
}

impl Vfs for CountingFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn VfsFile>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingFile {
            inner: self.inner.open(path)?,
            bytes_read: Arc::clone(&self.bytes_read),
        }))
    }

    fn metadata(&self, path: &str) -> io::Result<FileInfo> {
        self.inner.metadata(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        self.inner.read_dir(path)
    }
}

/// Serves `good_bytes` bytes of every file, then fails the next read
pub(crate) struct FailingReadFs {
    pub(crate) inner: MemFs,
    pub(crate) good_bytes: usize,
}

struct FailingFile {
    inner: Box<dyn VfsFile>,
    remaining: usize,
}

impl Read for FailingFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("disk on fire"));
        }
        let limit = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..limit])?;
        self.remaining -= n;
        Ok(n)
    }
}

impl VfsFile for FailingFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        self.inner.metadata()
    }
}

impl Vfs for FailingReadFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn VfsFile>> {
        Ok(Box::new(FailingFile {
            inner: self.inner.open(path)?,
            remaining: self.good_bytes,
        }))
    }

    fn metadata(&self, path: &str) -> io::Result<FileInfo> {
        self.inner.metadata(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        self.inner.read_dir(path)
    }
}

/// Records the total number of bytes it was fed and reports it as the digest
pub(crate) fn length_algorithm(id: &'static str) -> Algorithm {
    struct Length(u64);

    impl Accumulator for Length {
        fn update(&mut self, data: &[u8]) {
            self.0 += data.len() as u64;
        }

        fn finalize(self: Box<Self>) -> Vec<u8> {
            self.0.to_be_bytes().to_vec()
        }
    }

    Algorithm::new(id, || Box::new(Length(0)))
}

/// A latch that holds accumulators in `finalize` until opened
#[derive(Clone, Default)]
pub(crate) struct Gate {
    state: Arc<(Mutex<GateState>, Condvar)>,
}

#[derive(Default)]
struct GateState {
    open: bool,
    waiting: usize,
}

impl Gate {
    pub(crate) fn open(&self) {
        let (lock, cvar) = &*self.state;
        lock.lock().expect("gate lock").open = true;
        cvar.notify_all();
    }

    /// Block until `n` accumulators are parked in the gate
    pub(crate) fn wait_for(&self, n: usize) {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock().expect("gate lock");
        while state.waiting < n {
            state = cvar.wait(state).expect("gate wait");
        }
    }

    fn pass(&self) {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock().expect("gate lock");
        state.waiting += 1;
        cvar.notify_all();
        while !state.open {
            state = cvar.wait(state).expect("gate wait");
        }
    }

    /// Algorithm whose accumulators park in this gate when finalized
    pub(crate) fn algorithm(&self, id: &'static str) -> Algorithm {
        struct Gated(Gate);

        impl Accumulator for Gated {
            fn update(&mut self, _data: &[u8]) {}

            fn finalize(self: Box<Self>) -> Vec<u8> {
                self.0.pass();
                Vec::new()
            }
        }

        let gate = self.clone();
        Algorithm::new(id, move || Box::new(Gated(gate.clone())))
    }
}

/// Opens files normally but fails to stat the open handle
pub(crate) struct BrokenStatFs(pub(crate) MemFs);

struct BrokenStatFile(Box<dyn VfsFile>);

impl Read for BrokenStatFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl VfsFile for BrokenStatFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        Err(io::Error::other("stat failed"))
    }
}

impl Vfs for BrokenStatFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn VfsFile>> {
        Ok(Box::new(BrokenStatFile(self.0.open(path)?)))
    }

    fn metadata(&self, path: &str) -> io::Result<FileInfo> {
        self.0.metadata(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        self.0.read_dir(path)
    }
}

/// Fails every other read with `Interrupted`, starting with the first
pub(crate) struct InterruptingFs {
    pub(crate) inner: MemFs,
    pub(crate) interrupts: Arc<AtomicUsize>,
}

struct InterruptingFile {
    inner: Box<dyn VfsFile>,
    interrupt_next: bool,
    interrupts: Arc<AtomicUsize>,
}

impl Read for InterruptingFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            self.interrupts.fetch_add(1, Ordering::SeqCst);
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupt_next = true;
        self.inner.read(buf)
    }
}

impl VfsFile for InterruptingFile {
    fn metadata(&self) -> io::Result<FileInfo> {
        self.inner.metadata()
    }
}

impl Vfs for InterruptingFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn VfsFile>> {
        Ok(Box::new(InterruptingFile {
            inner: self.inner.open(path)?,
            interrupt_next: true,
            interrupts: Arc::clone(&self.interrupts),
        }))
    }

    fn metadata(&self, path: &str) -> io::Result<FileInfo> {
        self.inner.metadata(path)
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        self.inner.read_dir(path)
    }
}
