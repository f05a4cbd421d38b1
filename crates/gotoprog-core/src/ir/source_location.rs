use crate::interner::StringId;

/// Where an instruction came from, plus the property metadata attached to
/// assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: Option<StringId>,
    pub line: Option<u32>,
    pub function: Option<StringId>,
    pub property_class: Option<StringId>,
    pub comment: Option<String>,
}

impl SourceLocation {
    pub fn new(file: StringId, line: u32) -> Self {
        Self {
            file: Some(file),
            line: Some(line),
            ..Self::default()
        }
    }
}
