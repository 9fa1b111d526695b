use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::bitmap::OcrImage;
use crate::engine::{OcrError, RecognitionLevel, RecognitionOptions};
use crate::region::{NormalizedRect, Observation};

extern "C" {
    fn swiftocr_vision_recognize(
        pixels: *const u8,
        width: u32,
        height: u32,
        bytes_per_row: u64,
        fast: u8,
        language_correction: u8,
        auto_detect_language: u8,
        languages: *const c_char,
        custom_words: *const c_char,
        out_data: *mut *mut u8,
        out_len: *mut u64,
        out_error: *mut *mut c_char,
    ) -> i32;

    fn swiftocr_vision_free_data(ptr: *mut u8, len: u64);
    fn swiftocr_vision_free_error(ptr: *mut c_char);
}

unsafe fn parse_output(
    data: *mut u8,
    len: u64,
    error: *mut c_char,
    status: i32,
) -> Result<Vec<Observation>, OcrError> {
    if status != 0 || !error.is_null() {
        let msg = if !error.is_null() {
            let s = CStr::from_ptr(error).to_string_lossy().into_owned();
            swiftocr_vision_free_error(error);
            s
        } else {
            format!("Vision request failed with status {status}")
        };
        if !data.is_null() {
            swiftocr_vision_free_data(data, len);
        }
        return Err(OcrError::EngineError(msg));
    }

    if data.is_null() || len == 0 {
        return Ok(Vec::new());
    }

    let slice = std::slice::from_raw_parts(data, len as usize);
    let observations = deserialize_observations(slice);
    swiftocr_vision_free_data(data, len);
    observations
}

/// Little-endian layout written by the Swift side:
/// `u32 count`, then per observation `u32 text_len`, UTF-8 text,
/// `f32 confidence`, and `f64 x, y, width, height`.
pub(crate) fn deserialize_observations(data: &[u8]) -> Result<Vec<Observation>, OcrError> {
    let mut reader = Reader { data, pos: 0 };

    let count = reader.u32()? as usize;
    // Each record is at least 40 bytes; don't trust `count` for the allocation.
    let mut observations = Vec::with_capacity(count.min(data.len() / 40));

    for _ in 0..count {
        let text_len = reader.u32()? as usize;
        let text = String::from_utf8_lossy(reader.take(text_len, "text")?).into_owned();
        let confidence = f32::from_le_bytes(reader.array::<4>("confidence")?);
        let x = reader.f64()?;
        let y = reader.f64()?;
        let width = reader.f64()?;
        let height = reader.f64()?;

        observations.push(Observation {
            text,
            confidence,
            rect: NormalizedRect::new(x, y, width, height),
        });
    }

    Ok(observations)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], OcrError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| OcrError::EngineError(format!("truncated {what}")))?;
        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], OcrError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, OcrError> {
        Ok(u32::from_le_bytes(self.array::<4>("length")?))
    }

    fn f64(&mut self) -> Result<f64, OcrError> {
        Ok(f64::from_le_bytes(self.array::<8>("bounding box")?))
    }
}

fn joined_c_string(items: &[String], what: &str) -> Result<CString, OcrError> {
    if let Some(bad) = items.iter().find(|item| item.contains('\n')) {
        return Err(OcrError::InvalidInput(format!(
            "{what} entry contains a line break: {bad:?}"
        )));
    }
    CString::new(items.join("\n"))
        .map_err(|_| OcrError::InvalidInput(format!("null byte in {what}")))
}

pub fn recognize(
    image: &OcrImage,
    options: &RecognitionOptions,
) -> Result<Vec<Observation>, OcrError> {
    let languages = joined_c_string(&options.languages, "languages")?;
    let custom_words = joined_c_string(&options.custom_words, "custom words")?;

    let mut data: *mut u8 = std::ptr::null_mut();
    let mut len: u64 = 0;
    let mut error: *mut c_char = std::ptr::null_mut();

    unsafe {
        let status = swiftocr_vision_recognize(
            image.pixels().as_ptr(),
            image.width(),
            image.height(),
            image.bytes_per_row() as u64,
            u8::from(options.level == RecognitionLevel::Fast),
            u8::from(options.language_correction),
            u8::from(options.auto_detect_language),
            languages.as_ptr(),
            custom_words.as_ptr(),
            &mut data,
            &mut len,
            &mut error,
        );
        parse_output(data, len, error, status)
    }
}
