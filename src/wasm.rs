use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

use crate::export::{create_kotwords_export, to_apz, KotwordsExport};
use crate::generator::{generate, AcrosticError, AcrosticOptions};
use crate::lexicon::{Lexicon, LexiconFilter};
use crate::log::init_logger;
use crate::solver::SolveStatus;

/// Structured error information for JavaScript consumers
#[derive(serde::Serialize)]
struct WasmError {
    /// Error code (e.g., "C004", "S001")
    code: String,
    /// Display message
    message: String,
    /// Short description of error type
    description: String,
    /// Detailed explanation
    details: String,
    /// Optional helpful suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl From<AcrosticError> for WasmError {
    fn from(e: AcrosticError) -> Self {
        WasmError {
            code: e.code().to_string(),
            message: e.to_string(),
            description: e.description().to_string(),
            details: e.details().to_string(),
            help: e.help().map(ToString::to_string),
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(e: WasmError) -> Self {
        let mut msg = format!("Error {}: {}", e.code, e.message);

        if !e.details.is_empty() {
            msg.push_str(&format!("\n\n{}", e.details));
        }

        if let Some(help) = e.help {
            msg.push_str(&format!("\n\nSuggestion: {help}"));
        }

        js_sys::Error::new(&msg).into()
    }
}

fn serialization_error(code: &str, what: &str, e: &serde_wasm_bindgen::Error) -> WasmError {
    WasmError {
        code: code.to_string(),
        message: format!("serialization failed: {e}"),
        description: format!("Failed to serialize {what}"),
        details: format!("The {what} could not be converted to JavaScript format."),
        help: Some("This is an internal error. Please report this issue.".to_string()),
    }
}

fn string_list(value: JsValue, name: &str) -> Result<Vec<String>, WasmError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| WasmError {
        code: "WASM001".to_string(),
        message: format!("{name} must be string[]: {e}"),
        description: "Invalid word-list argument".to_string(),
        details: format!("The {name} parameter must be a JavaScript array of strings."),
        help: Some("Pass e.g. ['cab', 'dog'], or an empty array".to_string()),
    })
}

/// Initialize logging (Debug level if `debug_enabled`, else Info) and the panic hook.
///
/// Call once from JavaScript after the WASM module loads.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    console_error_panic_hook::set_once();
    init_logger(debug_enabled);
    log::info!("WASM module initialized");
}

/// Parse `word;score` lines and return the surviving words, sorted by length
/// then alphabetically.
///
/// # Errors
/// A JS `Error` if the bounds contradict each other or no entry survives.
#[wasm_bindgen]
pub fn parse_lexicon(text: &str, min_score: i32, min_len: usize, max_len: usize) -> Result<JsValue, JsValue> {
    let filter = LexiconFilter { min_score, min_len, max_len };
    let lexicon = Lexicon::from_text(text, "upload", &filter).map_err(|e| WasmError::from(AcrosticError::from(e)))?;
    let words: Vec<&str> = lexicon.words().collect();
    to_value(&words).map_err(|e| serialization_error("WASM003", "lexicon", &e).into())
}

#[derive(serde::Serialize)]
struct WasmAcrosticResult {
    /// Uppercase answers in source order; empty when infeasible.
    answers: Vec<String>,
    status: &'static str,
    nodes: u64,
    elapsed_ms: f64,
    /// Present only for a feasible result.
    #[serde(skip_serializing_if = "Option::is_none")]
    kotwords: Option<KotwordsExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apz: Option<String>,
}

/// JS entry: generate an acrostic from an uploaded lexicon.
///
/// `excluded` and `included` are `string[]` (or `undefined`). `seed` fixes the
/// grid-key shuffle; without it the browser's entropy source is used.
///
/// # Errors
/// A JS `Error` carrying the error code, description, details and help.
#[wasm_bindgen]
pub fn generate_acrostic_wasm(
    quote: &str,
    source: &str,
    lexicon_text: &str,
    min_score: i32,
    excluded: JsValue,
    included: JsValue,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let filter = LexiconFilter { min_score, ..LexiconFilter::default() };
    let lexicon = Lexicon::from_text(lexicon_text, "upload", &filter).map_err(|e| WasmError::from(AcrosticError::from(e)))?;

    let options = AcrosticOptions {
        excluded: string_list(excluded, "excluded")?,
        included: string_list(included, "included")?,
        ..AcrosticOptions::default()
    };

    let acrostic = generate(quote, source, &lexicon, &options).map_err(WasmError::from)?;

    let (kotwords, apz) = if acrostic.status == SolveStatus::Feasible {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fields = create_kotwords_export(quote, source, &acrostic.words, &mut rng)
            .map_err(|e| WasmError::from(AcrosticError::from(e)))?;
        let apz = to_apz(&fields, source);
        (Some(fields), Some(apz))
    } else {
        (None, None)
    };

    let result = WasmAcrosticResult {
        answers: acrostic.words.iter().map(|w| w.to_uppercase()).collect(),
        status: if acrostic.is_feasible() { "feasible" } else { "infeasible" },
        nodes: acrostic.stats.nodes,
        elapsed_ms: acrostic.stats.elapsed.as_secs_f64() * 1000.0,
        kotwords,
        apz,
    };

    to_value(&result).map_err(|e| serialization_error("WASM002", "acrostic result", &e).into())
}

/// Build a copy/paste report for bug reports.
#[wasm_bindgen]
pub fn get_debug_info(quote: &str, source: &str, error_message: &str, lexicon_size: usize) -> String {
    use std::fmt::Write;
    let mut report = String::new();

    // writing to a String never fails
    let _ = writeln!(&mut report, "=== ACROSTIC DEBUG REPORT ===");
    let _ = writeln!(&mut report, "Version: {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Error");
    let _ = writeln!(&mut report, "{error_message}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Input");
    let _ = writeln!(&mut report, "Quote: {quote}");
    let _ = writeln!(&mut report, "Source: {source}");
    let _ = writeln!(&mut report, "Lexicon Size: {lexicon_size}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "=== END DEBUG REPORT ===");

    report
}
