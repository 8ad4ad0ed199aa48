use std::path::Path;
use std::time::Instant;

use base64::Engine;
use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use serde::Serialize;

use super::{require_keys, StorageError};

/// Appended to a lookup `filepath` to name its image container.
pub const IMAGES_SUFFIX: &str = "_images.h5";

/// Top-level HDF5 group holding one dataset per uuid.
pub const IMAGES_GROUP: &str = "images";

#[derive(Debug, Clone, Serialize)]
pub struct ImagePayload {
    pub image_b64: String,
    pub fetch_time_ms: f64,
}

pub fn container_path(filepath: &str) -> String {
    format!("{filepath}{IMAGES_SUFFIX}")
}

/// Read the raw bytes stored under `images/{uuid}` in `{filepath}_images.h5`.
///
/// The container is opened fresh on every call. `fetch_time_ms` covers the
/// open, the read and the base64 encoding.
pub fn fetch_image(uuid: &str, filepath: &str) -> Result<ImagePayload, StorageError> {
    require_keys(uuid, filepath)?;

    let start = Instant::now();
    let container = container_path(filepath);
    if !Path::new(&container).exists() {
        return Err(StorageError::NotFound(format!(
            "H5 file not found: {container}"
        )));
    }

    let missing = || StorageError::NotFound(format!("Image {uuid} not found"));

    let file = hdf5::File::open(&container)?;
    if !file.link_exists(IMAGES_GROUP) {
        return Err(missing());
    }
    let group = file.group(IMAGES_GROUP)?;
    if !group.link_exists(uuid) {
        return Err(missing());
    }

    let bytes = read_bytes(&group.dataset(uuid)?)?;
    let image_b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
    let fetch_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::debug!(
        uuid = %uuid,
        container = %container,
        bytes = bytes.len(),
        fetch_time_ms,
        "Fetched image"
    );

    Ok(ImagePayload {
        image_b64,
        fetch_time_ms,
    })
}

/// The dataset's elements as native-endian bytes, without any value conversion.
///
/// Wider numeric types are read in their own type and flattened, so a `u16`
/// entry yields two bytes per element rather than being narrowed to `u8`.
fn read_bytes(dataset: &hdf5::Dataset) -> Result<Vec<u8>, StorageError> {
    let bytes = match dataset.dtype()?.to_descriptor()? {
        TypeDescriptor::Unsigned(IntSize::U1) => dataset.read_raw::<u8>()?,
        TypeDescriptor::Unsigned(IntSize::U2) => flatten(dataset.read_raw()?, u16::to_ne_bytes),
        TypeDescriptor::Unsigned(IntSize::U4) => flatten(dataset.read_raw()?, u32::to_ne_bytes),
        TypeDescriptor::Unsigned(IntSize::U8) => flatten(dataset.read_raw()?, u64::to_ne_bytes),
        TypeDescriptor::Integer(IntSize::U1) => flatten(dataset.read_raw()?, i8::to_ne_bytes),
        TypeDescriptor::Integer(IntSize::U2) => flatten(dataset.read_raw()?, i16::to_ne_bytes),
        TypeDescriptor::Integer(IntSize::U4) => flatten(dataset.read_raw()?, i32::to_ne_bytes),
        TypeDescriptor::Integer(IntSize::U8) => flatten(dataset.read_raw()?, i64::to_ne_bytes),
        TypeDescriptor::Float(FloatSize::U4) => flatten(dataset.read_raw()?, f32::to_ne_bytes),
        TypeDescriptor::Float(FloatSize::U8) => flatten(dataset.read_raw()?, f64::to_ne_bytes),
        other => {
            return Err(StorageError::Parse(format!(
                "Unsupported image dtype: {other:?}"
            )))
        }
    };
    Ok(bytes)
}

fn flatten<T, const N: usize>(values: Vec<T>, to_bytes: fn(T) -> [u8; N]) -> Vec<u8> {
    values.into_iter().flat_map(to_bytes).collect()
}
