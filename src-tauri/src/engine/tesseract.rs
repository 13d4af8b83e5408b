//! Tesseract backend for the [`OcrEngine`] trait.
//!
//! Drives rusty-tesseract's TSV interface and folds the word-level records
//! it returns into line-level spans.

use std::collections::HashMap;
use std::path::Path;

use super::{EngineError, OcrEngine, OcrSpan, Region};

const DEFAULT_LANG: &str = "eng";

/// Word-level record as it comes back from the TSV output, before merging.
#[derive(Debug, Clone)]
struct WordBox {
    block: i32,
    paragraph: i32,
    line: i32,
    region: Region,
    confidence: f32,
    text: String,
}

pub struct TesseractEngine {
    lang: String,
}

impl TesseractEngine {
    /// Probe the installed Tesseract once. `Err` means there is no engine on
    /// this machine and the app runs with extraction disabled.
    pub fn new() -> Result<Self, EngineError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        let lang = std::env::var("OCR_LANG").unwrap_or_else(|_| DEFAULT_LANG.to_string());
        log::info!("[OCR] Tesseract {} ready (lang={})", version.trim(), lang);
        Ok(Self { lang })
    }

    fn args(&self) -> rusty_tesseract::Args {
        rusty_tesseract::Args {
            lang: self.lang.clone(),
            config_variables: HashMap::from([("tessedit_create_tsv".into(), "1".into())]),
            ..rusty_tesseract::Args::default()
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, path: &Path) -> Result<Vec<OcrSpan>, EngineError> {
        let start = std::time::Instant::now();

        let dynamic = image::open(path).map_err(|e| EngineError::ImageLoad(e.to_string()))?;
        let ocr_image = rusty_tesseract::Image::from_dynamic_image(&dynamic)
            .map_err(|e| EngineError::ImageLoad(e.to_string()))?;

        let data = rusty_tesseract::image_to_data(&ocr_image, &self.args())
            .map_err(|e| EngineError::Recognition(e.to_string()))?;

        // Word rows with negative confidence are layout records (pages,
        // blocks, lines), not text.
        let words: Vec<WordBox> = data
            .data
            .iter()
            .filter(|d| d.conf >= 0.0 && !d.text.trim().is_empty())
            .map(|d| WordBox {
                block: d.block_num,
                paragraph: d.par_num,
                line: d.line_num,
                region: Region {
                    left: d.left,
                    top: d.top,
                    width: d.width,
                    height: d.height,
                },
                confidence: d.conf,
                text: d.text.trim().to_string(),
            })
            .collect();

        let spans = merge_lines(words);
        log::info!(
            "[OCR] {}: {} span(s) in {}ms",
            path.display(),
            spans.len(),
            start.elapsed().as_millis()
        );
        Ok(spans)
    }
}

/// Fold word records into line-level spans keyed by (block, paragraph, line).
///
/// Texts join with single spaces, the region is the bounding union, and the
/// confidence is the mean over the merged words. Input order is preserved,
/// which for Tesseract TSV output is reading order.
fn merge_lines(words: Vec<WordBox>) -> Vec<OcrSpan> {
    struct LineAcc {
        key: (i32, i32, i32),
        region: Region,
        conf_sum: f32,
        count: u32,
        text: String,
    }

    impl LineAcc {
        fn finish(self) -> OcrSpan {
            OcrSpan {
                region: self.region,
                text: self.text,
                confidence: self.conf_sum / self.count as f32,
            }
        }
    }

    let mut spans = Vec::new();
    let mut acc: Option<LineAcc> = None;

    for word in words {
        let key = (word.block, word.paragraph, word.line);
        if let Some(a) = acc.as_mut().filter(|a| a.key == key) {
            a.region = a.region.union(&word.region);
            a.conf_sum += word.confidence;
            a.count += 1;
            a.text.push(' ');
            a.text.push_str(&word.text);
            continue;
        }
        if let Some(done) = acc.take() {
            spans.push(done.finish());
        }
        acc = Some(LineAcc {
            key,
            region: word.region,
            conf_sum: word.confidence,
            count: 1,
            text: word.text,
        });
    }
    if let Some(done) = acc {
        spans.push(done.finish());
    }
    spans
}
