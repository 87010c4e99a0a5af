//! Growable GPU buffers with a scoped in-place write.
//!
//! [`DynamicBuffer::write`] reallocates (2x) when data outgrows the
//! buffer. [`DynamicBuffer::write_scoped`] never reallocates; it lends a
//! closure the queue's staging memory for the first `count` elements.

use std::fmt;

use wgpu::util::DeviceExt;

/// Reasons a scoped write could not acquire or fill the staging view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferWriteError {
    /// Zero bytes requested.
    Empty,
    /// Requested bytes exceed the buffer capacity.
    TooLarge {
        /// Bytes requested.
        needed: usize,
        /// Bytes available.
        capacity: usize,
    },
    /// The queue could not provide a staging view.
    StagingUnavailable,
    /// The write size or staging memory does not fit the element type.
    Misaligned,
}

impl fmt::Display for BufferWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "scoped write of zero bytes"),
            Self::TooLarge { needed, capacity } => write!(
                f,
                "scoped write of {needed} bytes exceeds capacity {capacity}"
            ),
            Self::StagingUnavailable => {
                write!(f, "queue staging view unavailable")
            }
            Self::Misaligned => {
                write!(f, "staging memory misaligned for element type")
            }
        }
    }
}

impl std::error::Error for BufferWriteError {}

/// Byte size of a scoped write of `count` elements of `T`.
fn scoped_write_size<T>(
    count: usize,
    capacity: usize,
) -> Result<wgpu::BufferSize, BufferWriteError> {
    let needed = count.checked_mul(size_of::<T>()).ok_or(
        BufferWriteError::TooLarge {
            needed: usize::MAX,
            capacity,
        },
    )?;
    let size =
        wgpu::BufferSize::new(needed as u64).ok_or(BufferWriteError::Empty)?;
    if needed > capacity {
        return Err(BufferWriteError::TooLarge { needed, capacity });
    }
    if needed as u64 % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(BufferWriteError::Misaligned);
    }
    Ok(size)
}

/// A GPU buffer that can grow dynamically
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(64); // Minimum 64 bytes

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Buffer initialized from existing data.
    #[must_use]
    pub fn new_with_data<T: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let data_bytes = bytemuck::cast_slice(data);
        let capacity = data_bytes.len();

        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data_bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            buffer,
            capacity,
            len: data_bytes.len(),
            usage,
            label: label.to_owned(),
        }
    }

    /// Replace the contents with `data`, reallocating first if it does
    /// not fit.
    ///
    /// Returns `true` if the buffer was reallocated; bind groups or
    /// slices taken from the old buffer are then stale.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let reallocated = self.reserve(device, bytes.len());
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = bytes.len();
        reallocated
    }

    fn reserve(&mut self, device: &wgpu::Device, needed: usize) -> bool {
        if needed <= self.capacity {
            return false;
        }
        // 2x growth, at least 1 KiB more
        let capacity = (needed * 2).max(self.capacity + 1024);
        self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&self.label),
            size: capacity as u64,
            usage: self.usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::debug!("{}: grew to {capacity} bytes", self.label);
        self.capacity = capacity;
        true
    }

    /// Fill the first `count` elements of the buffer in place.
    ///
    /// Acquires a staging view from the queue, hands it to `fill` as
    /// `&mut [T]`, and releases it when `fill` returns. The view is
    /// released on every path, including an `Err` from `fill`; whatever
    /// `fill` wrote before failing is still flushed to the buffer, but the
    /// recorded length only changes on success. Never grows the buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`BufferWriteError`] (converted into `E`) when the view
    /// cannot be acquired, or whatever error `fill` returns.
    pub fn write_scoped<T, R, E>(
        &mut self,
        queue: &wgpu::Queue,
        count: usize,
        fill: impl FnOnce(&mut [T]) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: bytemuck::Pod,
        E: From<BufferWriteError>,
    {
        let size = scoped_write_size::<T>(count, self.capacity)?;
        let result = {
            let mut view = queue
                .write_buffer_with(&self.buffer, 0, size)
                .ok_or(BufferWriteError::StagingUnavailable)?;
            let elements: &mut [T] = bytemuck::try_cast_slice_mut(&mut view[..])
                .map_err(|_| BufferWriteError::Misaligned)?;
            fill(elements)?
        };
        self.len = size.get() as usize;
        Ok(result)
    }

    /// The underlying GPU buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last successful write.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Vertex;

    #[test]
    fn scoped_size_for_highlight_triangle() {
        let size = scoped_write_size::<Vertex>(3, 96).unwrap();
        assert_eq!(size.get(), 96);
    }

    #[test]
    fn scoped_size_rejects_empty() {
        assert_eq!(
            scoped_write_size::<Vertex>(0, 96),
            Err(BufferWriteError::Empty)
        );
    }

    #[test]
    fn scoped_size_rejects_overflowing_capacity() {
        assert_eq!(
            scoped_write_size::<Vertex>(4, 96),
            Err(BufferWriteError::TooLarge {
                needed: 128,
                capacity: 96
            })
        );
        assert!(matches!(
            scoped_write_size::<Vertex>(usize::MAX, 96),
            Err(BufferWriteError::TooLarge { .. })
        ));
    }

    #[test]
    fn scoped_size_rejects_unaligned_length() {
        assert_eq!(
            scoped_write_size::<u8>(3, 64),
            Err(BufferWriteError::Misaligned)
        );
        assert!(scoped_write_size::<u8>(8, 64).is_ok());
    }
}
