use crate::license::patterns::SignatureSet;

/// A license body found in a library's raw section.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedLicense {
    pub name: String,
    pub spdx_id: Option<String>,
    pub content: String,
}

/// Name of the catch-all body holding whatever no signature matched.
pub fn fallback_name(library_name: &str) -> String {
    format!("{library_name} license")
}

/// Run every signature, in order, over the text left by the previous ones.
///
/// Each signature takes at most its first match, and that span is cut out of
/// the remaining text before the next signature runs. Returns the extracted
/// bodies and the untouched remainder.
pub fn extract_known(section: &str, signatures: &SignatureSet) -> (Vec<ExtractedLicense>, String) {
    signatures
        .iter()
        .fold((Vec::new(), section.to_string()), |(mut found, remaining), sig| {
            let Some(span) = sig.find(&remaining) else {
                return (found, remaining);
            };
            found.push(ExtractedLicense {
                name: sig.name.clone(),
                spdx_id: sig.spdx_id.clone(),
                content: remaining[span.clone()].to_string(),
            });
            let rest = format!("{}{}", &remaining[..span.start], &remaining[span.end..]);
            (found, rest)
        })
}

/// Split one library's section into known licenses plus the trimmed
/// remainder as `"<library> license"`.
///
/// The fallback is always the last element, even when it is empty.
pub fn classify_section(
    library_name: &str,
    section: &str,
    signatures: &SignatureSet,
) -> Vec<ExtractedLicense> {
    let (mut found, remaining) = extract_known(section, signatures);
    found.push(ExtractedLicense {
        name: fallback_name(library_name),
        spdx_id: None,
        content: remaining.trim().to_string(),
    });
    found
}
