//! Metadata block written ahead of the header row.

/// Descriptive metadata written at the top of every delimited archive.
///
/// The lines always come out in the same order, see [`Preamble::lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preamble {
    /// Dataset title.
    pub title: String,
    /// Dataset abstract.
    pub abstract_text: String,
    /// Attribution (citation) for the dataset.
    pub attribution: String,
    /// Canonical spatial reference string of the feature class.
    pub spatial_reference: String,
    /// Terms of use.
    pub terms_of_use: String,
    /// Name of the exported feature class.
    pub feature_class: String,
    /// Base file name of the source container.
    pub container_name: String,
    /// Contact for the dataset.
    pub contact: String,
}

impl Preamble {
    /// The preamble lines for a file delimited by `delimiter`, without line terminators.
    ///
    /// Order: title, abstract, attribution, spatial reference, terms of use, archival
    /// disclosure, contact, delimiter note.
    #[must_use]
    pub fn lines(&self, delimiter: &str) -> Vec<String> {
        vec![
            self.title.clone(),
            self.abstract_text.clone(),
            self.attribution.clone(),
            format!("Spatial reference: {}", self.spatial_reference),
            self.terms_of_use.clone(),
            disclosure(&self.feature_class, &self.container_name),
            format!("Dataset contact: {}", self.contact),
            delimiter_note(delimiter),
        ]
    }
}

/// Sentence stating what the archive is and that the source container remains primary.
#[must_use]
pub fn disclosure(feature_class: &str, container_name: &str) -> String {
    format!(
        "This file is a human and machine readable equivalent of the layer {feature_class} \
         exported from the geodatabase {container_name} and was generated to back up and \
         archive the parent dataset for posterity in a non-proprietary text format in case \
         the parent geodatabase format should become unsupported or outmoded. This file was \
         not intended for day to day analytical work. Where possible use the parent geodatabase."
    )
}

/// Note explaining why the row values are split by `delimiter`.
#[must_use]
pub fn delimiter_note(delimiter: &str) -> String {
    format!(
        "Note: Row field values are separated by {} to avoid software confusion with the \
         commas commonly found in WKT representations of geometry.",
        describe_delimiter(delimiter)
    )
}

fn describe_delimiter(delimiter: &str) -> String {
    match delimiter {
        "|" => "a pipe character |".to_string(),
        "\t" => "a tab character".to_string(),
        ";" => "a semicolon character ;".to_string(),
        "," => "a comma character ,".to_string(),
        other if other.chars().count() == 1 => format!("the character {other}"),
        other => format!("the character sequence {other}"),
    }
}
