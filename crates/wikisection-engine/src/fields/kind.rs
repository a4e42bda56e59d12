use std::fmt;

/// Bumped whenever a kind is added, removed, reordered or re-marked.
pub const VOCABULARY_VERSION: u32 = 1;

/// Every field a dictionary section may contain.
///
/// Declaration order is the order fields are stored and printed in, and the
/// derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    Radical,
    Strokes,
    Variants,
    StrokeOrder,
    Codes,
    Dictionaries,
    Readings,
    Orthographies,
    Transliteration,
    Pronunciation,
    Definitions,
    Inflection,
    Examples,
    Syntax,
    Collocations,
    Synonyms,
    Antonyms,
    Hypernyms,
    Hyponyms,
    Holonyms,
    Meronyms,
    DerivedTerms,
    Compounds,
    Idioms,
    Etymology,
    Cognates,
    Hanja,
    Usage,
    Notes,
    Translations,
    Sources,
    Gallery,
    Homophones,
    Abbreviations,
}

impl FieldKind {
    pub const ALL: [FieldKind; 34] = [
        FieldKind::Radical,
        FieldKind::Strokes,
        FieldKind::Variants,
        FieldKind::StrokeOrder,
        FieldKind::Codes,
        FieldKind::Dictionaries,
        FieldKind::Readings,
        FieldKind::Orthographies,
        FieldKind::Transliteration,
        FieldKind::Pronunciation,
        FieldKind::Definitions,
        FieldKind::Inflection,
        FieldKind::Examples,
        FieldKind::Syntax,
        FieldKind::Collocations,
        FieldKind::Synonyms,
        FieldKind::Antonyms,
        FieldKind::Hypernyms,
        FieldKind::Hyponyms,
        FieldKind::Holonyms,
        FieldKind::Meronyms,
        FieldKind::DerivedTerms,
        FieldKind::Compounds,
        FieldKind::Idioms,
        FieldKind::Etymology,
        FieldKind::Cognates,
        FieldKind::Hanja,
        FieldKind::Usage,
        FieldKind::Notes,
        FieldKind::Translations,
        FieldKind::Sources,
        FieldKind::Gallery,
        FieldKind::Homophones,
        FieldKind::Abbreviations,
    ];

    /// The template that opens this field in wikitext.
    pub fn marker(self) -> &'static str {
        match self {
            FieldKind::Radical => "{{klucz}}",
            FieldKind::Strokes => "{{kreski}}",
            FieldKind::Variants => "{{warianty}}",
            FieldKind::StrokeOrder => "{{kolejność}}",
            FieldKind::Codes => "{{kody}}",
            FieldKind::Dictionaries => "{{słowniki}}",
            FieldKind::Readings => "{{czytania}}",
            FieldKind::Orthographies => "{{ortografie}}",
            FieldKind::Transliteration => "{{transliteracja}}",
            FieldKind::Pronunciation => "{{wymowa}}",
            FieldKind::Definitions => "{{znaczenia}}",
            FieldKind::Inflection => "{{odmiana}}",
            FieldKind::Examples => "{{przykłady}}",
            FieldKind::Syntax => "{{składnia}}",
            FieldKind::Collocations => "{{kolokacje}}",
            FieldKind::Synonyms => "{{synonimy}}",
            FieldKind::Antonyms => "{{antonimy}}",
            FieldKind::Hypernyms => "{{hiperonimy}}",
            FieldKind::Hyponyms => "{{hiponimy}}",
            FieldKind::Holonyms => "{{holonimy}}",
            FieldKind::Meronyms => "{{meronimy}}",
            FieldKind::DerivedTerms => "{{pokrewne}}",
            FieldKind::Compounds => "{{złożenia}}",
            FieldKind::Idioms => "{{frazeologia}}",
            FieldKind::Etymology => "{{etymologia}}",
            FieldKind::Cognates => "{{kognaty}}",
            FieldKind::Hanja => "{{hanja}}",
            FieldKind::Usage => "{{użycie}}",
            FieldKind::Notes => "{{uwagi}}",
            FieldKind::Translations => "{{tłumaczenia}}",
            FieldKind::Sources => "{{źródła}}",
            FieldKind::Gallery => "{{galeria}}",
            FieldKind::Homophones => "{{homofony}}",
            FieldKind::Abbreviations => "{{skróty}}",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.marker() == marker)
    }

    /// Kinds whose content carries its own line markup, so edits never get a
    /// default line marker added.
    pub fn manages_own_markers(self) -> bool {
        matches!(self, FieldKind::Definitions | FieldKind::Sources)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}
