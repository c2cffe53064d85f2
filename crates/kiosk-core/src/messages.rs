//! User-facing Marathi status and prompt texts

use intent_parser::Commodity;
use voice_local::RecognitionErrorKind;

pub const UNSUPPORTED: &str = "क्षमस्व, आपला ब्राउझर व्हॉइस रेकॉर्डिंगला सपोर्ट करत नाही.";
pub const WELCOME: &str = "भाव विचारण्यासाठी बटण दाबा.";
pub const START_FAILED: &str = "सुरुवात करताना त्रुटी आली.";
pub const LISTENING: &str = "ऐकत आहे... बोला...";
pub const READY_AGAIN: &str = "पुन्हा विचारण्यासाठी बटण दाबा.";
pub const SPEAK_FAILED: &str = "उत्तर ऐकवताना त्रुटी आली.";
pub const PERMISSION_DENIED: &str = "मायक्रोफोनची परवानगी नाकारली.";
pub const LANGUAGE_UNSUPPORTED: &str = "मराठी भाषा सपोर्टेड नाही.";
pub const NO_SPEECH: &str = "मला काही ऐकू आले नाही.";

/// Spoken when no commodity keyword was heard.
pub const UNRECOGNIZED_PROMPT: &str =
    "क्षमस्व, मला समजले नाही. कृपया 'कांदा भाव' किंवा 'वाटाणा भाव' विचारा.";

pub fn heard(transcript: &str) -> String {
    format!("तुम्ही म्हणालात: \"{transcript}\"")
}

pub fn recognition_error(kind: &RecognitionErrorKind) -> String {
    match kind {
        RecognitionErrorKind::NotAllowed => PERMISSION_DENIED.to_string(),
        RecognitionErrorKind::LanguageNotSupported => LANGUAGE_UNSUPPORTED.to_string(),
        RecognitionErrorKind::NoSpeech => NO_SPEECH.to_string(),
        RecognitionErrorKind::Other(code) => format!("एक त्रुटी आली: {code}"),
    }
}

/// Spoken when the catalog cannot answer for a commodity.
pub fn data_unavailable(commodity: Commodity) -> String {
    format!(
        "क्षमस्व, आज {} भावाची माहिती उपलब्ध नाही.",
        commodity.native_name()
    )
}
