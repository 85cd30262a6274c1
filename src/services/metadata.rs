//! Provenance metadata resolution from directory conventions.
//!
//! A file's parent directory names its category; within a recognized
//! category, a substring of the filename selects a known document. Unknown
//! filenames degrade to the category's base fields, unknown directories to
//! the default guide category. Resolution never fails.

use std::path::Path;

use crate::models::ChunkMetadata;

/// Category-specific provenance for a resolved file.
#[derive(Debug, Clone, PartialEq)]
enum Provenance {
    LegalCode(&'static KnownLaw),
    Constitution,
    Scheme(&'static KnownScheme),
    Faq(&'static KnownFaq),
    /// Uncategorized file: generic guide provenance keyed by filename.
    Guide(String),
    /// Recognized category, no matching known document.
    Base,
}

#[derive(Debug, PartialEq)]
struct KnownLaw {
    marker: &'static str,
    name: &'static str,
    url: &'static str,
    document_type: &'static str,
}

#[derive(Debug, PartialEq)]
struct KnownScheme {
    marker: &'static str,
    name: &'static str,
    url: &'static str,
    ministry: &'static str,
    beneficiary_type: &'static [&'static str],
    benefit_type: &'static str,
}

#[derive(Debug, PartialEq)]
struct KnownFaq {
    marker: &'static str,
    name: &'static str,
    url: &'static str,
    ministry: &'static str,
    page_title: &'static str,
}

// Lookup tables for known documents. In a larger corpus these would move to
// a data file; the enumeration matches what the pipeline currently ingests.
const KNOWN_LAWS: &[KnownLaw] = &[KnownLaw {
    marker: "indian_penal_code",
    name: "Indian Penal Code, 1860",
    url: "https://www.indiacode.nic.in/handle/123456789/2263",
    document_type: "Code",
}];

const CONSTITUTION_NAME: &str = "The Constitution of India";
const CONSTITUTION_URL: &str = "https://www.indiacode.nic.in/handle/123456789/15663";

const KNOWN_SCHEMES: &[KnownScheme] = &[KnownScheme {
    marker: "pm_jay_scheme",
    name: "Pradhan Mantri Jan Arogya Yojana (PM-JAY)",
    url: "https://pmjay.gov.in/about/pmjay",
    ministry: "Ministry of Health and Family Welfare",
    beneficiary_type: &[
        "Below Poverty Line",
        "Socio-Economic Caste Census 2011 beneficiaries",
    ],
    benefit_type: "Healthcare",
}];

const KNOWN_FAQS: &[KnownFaq] = &[KnownFaq {
    marker: "ncrb_fir_faqs",
    name: "National Crime Records Bureau Portal - FAQs",
    url: "https://ncrb.gov.in/en/common-questions",
    ministry: "Ministry of Home Affairs",
    page_title: "Common Questions about FIR",
}];

const GUIDE_URL_PLACEHOLDER: &str = "URL_TO_BE_ADDED";

/// Resolve provenance metadata for a file from its location and name.
pub fn resolve_metadata(path: &Path) -> ChunkMetadata {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let directory = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut metadata = ChunkMetadata::base();
    classify(&directory, &filename).apply(&mut metadata);
    metadata
}

fn classify(directory: &str, filename: &str) -> Provenance {
    match directory {
        "legal_codes" => KNOWN_LAWS
            .iter()
            .find(|law| filename.contains(law.marker))
            .map(Provenance::LegalCode)
            .unwrap_or(Provenance::Base),
        "constitution" => Provenance::Constitution,
        "schemes" => KNOWN_SCHEMES
            .iter()
            .find(|scheme| filename.contains(scheme.marker))
            .map(Provenance::Scheme)
            .unwrap_or(Provenance::Base),
        "faqs" => KNOWN_FAQS
            .iter()
            .find(|faq| filename.contains(faq.marker))
            .map(Provenance::Faq)
            .unwrap_or(Provenance::Base),
        _ => Provenance::Guide(filename.to_string()),
    }
}

impl Provenance {
    fn apply(self, meta: &mut ChunkMetadata) {
        match self {
            Provenance::LegalCode(law) => {
                meta.source_type = Some("law".to_string());
                meta.source_name = Some(law.name.to_string());
                meta.source_url = Some(law.url.to_string());
                meta.document_type = Some(law.document_type.to_string());
            }
            Provenance::Constitution => {
                meta.source_type = Some("constitution".to_string());
                meta.source_name = Some(CONSTITUTION_NAME.to_string());
                meta.source_url = Some(CONSTITUTION_URL.to_string());
                meta.document_type = Some("Constitution".to_string());
            }
            Provenance::Scheme(scheme) => {
                meta.source_type = Some("scheme".to_string());
                meta.source_name = Some(scheme.name.to_string());
                meta.source_url = Some(scheme.url.to_string());
                meta.ministry = Some(scheme.ministry.to_string());
                meta.beneficiary_type = Some(
                    scheme
                        .beneficiary_type
                        .iter()
                        .map(|b| b.to_string())
                        .collect(),
                );
                meta.benefit_type = Some(scheme.benefit_type.to_string());
            }
            Provenance::Faq(faq) => {
                meta.source_type = Some("faq".to_string());
                meta.source_name = Some(faq.name.to_string());
                meta.source_url = Some(faq.url.to_string());
                meta.ministry = Some(faq.ministry.to_string());
                meta.page_title = Some(faq.page_title.to_string());
            }
            Provenance::Guide(filename) => {
                meta.source_type = Some("guide".to_string());
                meta.source_name = Some(filename);
                meta.source_url = Some(GUIDE_URL_PLACEHOLDER.to_string());
            }
            Provenance::Base => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_legal_code_match() {
        let path = PathBuf::from("data/raw/legal_codes/indian_penal_code_1860.pdf");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("law"));
        assert_eq!(meta.source_name.as_deref(), Some("Indian Penal Code, 1860"));
        assert_eq!(meta.document_type.as_deref(), Some("Code"));
        assert!(meta.ministry.is_none());
    }

    #[test]
    fn test_legal_code_unmatched_filename_yields_base_fields() {
        let path = PathBuf::from("data/raw/legal_codes/crpc_1973.pdf");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.language, "en");
        assert!(meta.source_type.is_none());
        assert!(meta.source_name.is_none());
    }

    #[test]
    fn test_constitution_matches_any_filename() {
        let path = PathBuf::from("data/raw/constitution/part_three.txt");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("constitution"));
        assert_eq!(meta.source_name.as_deref(), Some(CONSTITUTION_NAME));
        assert_eq!(meta.document_type.as_deref(), Some("Constitution"));
    }

    #[test]
    fn test_scheme_match() {
        let path = PathBuf::from("data/raw/schemes/pm_jay_scheme_overview.html");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("scheme"));
        assert_eq!(
            meta.ministry.as_deref(),
            Some("Ministry of Health and Family Welfare")
        );
        assert_eq!(meta.benefit_type.as_deref(), Some("Healthcare"));
        assert_eq!(meta.beneficiary_type.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_faq_match() {
        let path = PathBuf::from("data/raw/faqs/ncrb_fir_faqs.html");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("faq"));
        assert_eq!(meta.ministry.as_deref(), Some("Ministry of Home Affairs"));
        assert_eq!(meta.page_title.as_deref(), Some("Common Questions about FIR"));
    }

    #[test]
    fn test_unknown_directory_falls_back_to_guide() {
        let path = PathBuf::from("data/raw/misc/how_to_file_an_fir.txt");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("guide"));
        assert_eq!(meta.source_name.as_deref(), Some("how_to_file_an_fir.txt"));
        assert_eq!(meta.source_url.as_deref(), Some(GUIDE_URL_PLACEHOLDER));
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let path = PathBuf::from("data/raw/Legal_Codes/indian_penal_code.pdf");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.source_type.as_deref(), Some("guide"));
    }

    #[test]
    fn test_always_includes_base_fields() {
        let path = PathBuf::from("data/raw/faqs/unknown_page.html");
        let meta = resolve_metadata(&path);
        assert_eq!(meta.language, "en");
        assert!(meta.last_updated.ends_with('Z'));
    }
}
