use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

/// Memory-mapped byte region a caller can hand to a ring buffer as storage.
pub struct MmapRegion {
    file: Option<File>,
    mmap: MmapMut,
    locked: bool,
}

impl MmapRegion {
    /// Private anonymous mapping. Zero-filled by the kernel.
    pub fn anonymous(len: usize) -> io::Result<Self> {
        let len = non_zero_len(len);
        let mmap = MmapOptions::new().len(len).map_anon()?;
        debug!(len, "mapped anonymous region");

        Ok(Self {
            file: None,
            mmap,
            locked: false,
        })
    }

    /// Shared mapping of `path`, truncated and sized to `len` bytes.
    pub fn create<P: AsRef<Path>>(path: P, len: usize) -> io::Result<Self> {
        let len = non_zero_len(len);
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(len as u64)?;

        // SAFETY: the file was just created and truncated by us, and is kept
        // open for the lifetime of the mapping.
        let mmap = unsafe { MmapOptions::new().len(len).map_mut(&file)? };
        debug!(path = %path.display(), len, "mapped file region");

        Ok(Self {
            file: Some(file),
            mmap,
            locked: false,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    pub fn fill(&mut self, byte: u8) {
        self.mmap.fill(byte);
    }

    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Pins the pages in RAM so transfers never fault.
    pub fn lock(&mut self) -> io::Result<()> {
        if self.locked {
            return Ok(());
        }
        let result = unsafe { libc::mlock(self.mmap.as_ptr() as *const libc::c_void, self.len()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) -> io::Result<()> {
        if !self.locked {
            return Ok(());
        }
        let result =
            unsafe { libc::munlock(self.mmap.as_ptr() as *const libc::c_void, self.len()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        self.locked = false;
        Ok(())
    }

    pub fn advise_sequential(&self) -> io::Result<()> {
        let result = unsafe {
            libc::madvise(
                self.mmap.as_ptr() as *mut libc::c_void,
                self.len(),
                libc::MADV_SEQUENTIAL,
            )
        };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for MmapRegion {
    fn drop(&mut self) {
        if self.locked {
            let _ = self.unlock();
        }
        if self.file.is_some() {
            let _ = self.flush();
        }
    }
}

fn non_zero_len(len: usize) -> usize {
    if len > 0 {
        return len;
    }
    let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page > 0 { page as usize } else { 4096 }
}
