// unicode/mod.rs - Code point classification.
// General categories, scripts, Perl/POSIX class predicates and simple case
// folding. Everything here is pure data plus lookups; nothing is mutable.

mod tables;

use smallvec::SmallVec;

use tables::*;

// === General Category ===

/// Unicode general category (two-letter value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralCategory {
    Cc, Cf, Cn, Co, Cs,
    Ll, Lm, Lo, Lt, Lu,
    Mc, Me, Mn,
    Nd, Nl, No,
    Pc, Pd, Pe, Pf, Pi, Po, Ps,
    Sc, Sk, Sm, So,
    Zl, Zp, Zs,
}

impl GeneralCategory {
    /// The one-letter major class ('L', 'M', 'N', 'P', 'S', 'Z' or 'C').
    pub fn major(self) -> u8 {
        use GeneralCategory::*;
        match self {
            Cc | Cf | Cn | Co | Cs => b'C',
            Ll | Lm | Lo | Lt | Lu => b'L',
            Mc | Me | Mn => b'M',
            Nd | Nl | No => b'N',
            Pc | Pd | Pe | Pf | Pi | Po | Ps => b'P',
            Sc | Sk | Sm | So => b'S',
            Zl | Zp | Zs => b'Z',
        }
    }

    fn from_name(name: &str) -> Option<GeneralCategory> {
        use GeneralCategory::*;
        Some(match name {
            "cc" => Cc, "cf" => Cf, "cn" => Cn, "co" => Co, "cs" => Cs,
            "ll" => Ll, "lm" => Lm, "lo" => Lo, "lt" => Lt, "lu" => Lu,
            "mc" => Mc, "me" => Me, "mn" => Mn,
            "nd" => Nd, "nl" => Nl, "no" => No,
            "pc" => Pc, "pd" => Pd, "pe" => Pe, "pf" => Pf, "pi" => Pi, "po" => Po, "ps" => Ps,
            "sc" => Sc, "sk" => Sk, "sm" => Sm, "so" => So,
            "zl" => Zl, "zp" => Zp, "zs" => Zs,
            _ => return None,
        })
    }
}

/// Latin-1 punctuation and symbols whose category the char predicates get wrong.
fn latin1_category(cp: u32) -> Option<GeneralCategory> {
    use GeneralCategory::*;
    Some(match cp {
        0xa1 | 0xa7 | 0xb6 | 0xb7 | 0xbf => Po,
        0xa2..=0xa5 => Sc,
        0xa6 | 0xa9 | 0xae | 0xb0 => So,
        0xa8 | 0xaf | 0xb4 | 0xb8 => Sk,
        0xaa | 0xba => Lo,
        0xab => Pi,
        0xbb => Pf,
        0xac | 0xb1 | 0xd7 | 0xf7 => Sm,
        0xad => Cf,
        0xb2 | 0xb3 | 0xb9 | 0xbc..=0xbe => No,
        _ => return None,
    })
}

/// General category of `cp`.
pub fn general_category(cp: u32) -> GeneralCategory {
    use GeneralCategory::*;
    if (0xd800..=0xdfff).contains(&cp) {
        return Cs;
    }
    let ch = match char::from_u32(cp) {
        Some(ch) => ch,
        None => return Cn,
    };
    if ch.is_control() {
        return Cc;
    }
    if (0xa0..=0xff).contains(&cp) {
        if let Some(gc) = latin1_category(cp) {
            return gc;
        }
    }
    if in_ranges(CF, cp) {
        return Cf;
    }
    match cp {
        0x2028 => return Zl,
        0x2029 => return Zp,
        _ => {}
    }
    if ch.is_whitespace() {
        return Zs;
    }
    if in_ranges(ME, cp) {
        return Me;
    }
    if in_ranges(MC, cp) {
        return Mc;
    }
    if in_ranges(MN, cp) {
        return Mn;
    }
    if is_decimal(cp) {
        return Nd;
    }
    if ch.is_numeric() {
        return if in_ranges(NL, cp) { Nl } else { No };
    }
    if ch.is_alphabetic() {
        if in_ranges(LT, cp) {
            return Lt;
        }
        if in_ranges(LM, cp) {
            return Lm;
        }
        if ch.is_uppercase() {
            return Lu;
        }
        if ch.is_lowercase() {
            return Ll;
        }
        return Lo;
    }
    if in_ranges(CO, cp) {
        return Co;
    }
    if (0xfdd0..=0xfdef).contains(&cp) || (cp & 0xfffe) == 0xfffe || in_ranges(UNASSIGNED, cp) {
        return Cn;
    }
    symbol_or_punct(cp)
}

fn symbol_or_punct(cp: u32) -> GeneralCategory {
    use GeneralCategory::*;
    if in_ranges(SC, cp) {
        return Sc;
    }
    if in_ranges(SM, cp) {
        return Sm;
    }
    if in_ranges(SK, cp) {
        return Sk;
    }
    if in_ranges(PD, cp) {
        return Pd;
    }
    if in_ranges(PC, cp) {
        return Pc;
    }
    if PS.contains(&cp) {
        return Ps;
    }
    if PE.contains(&cp) {
        return Pe;
    }
    if PI.contains(&cp) {
        return Pi;
    }
    if PF.contains(&cp) {
        return Pf;
    }
    for &(lo, hi) in BRACKET_PAIRS {
        if lo <= cp && cp <= hi {
            return if (cp - lo) % 2 == 0 { Ps } else { Pe };
        }
    }
    if in_ranges(PO, cp) {
        return Po;
    }
    So
}

fn is_decimal(cp: u32) -> bool {
    DIGIT_ZEROS.iter().any(|&z| z <= cp && cp < z + 10)
}

// === Scripts ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Common,
    Inherited,
    Arabic,
    Armenian,
    Bengali,
    Bopomofo,
    Cherokee,
    Coptic,
    Cyrillic,
    Devanagari,
    Ethiopic,
    Georgian,
    Greek,
    Gujarati,
    Gurmukhi,
    Han,
    Hangul,
    Hebrew,
    Hiragana,
    Kannada,
    Katakana,
    Khmer,
    Lao,
    Latin,
    Malayalam,
    Mongolian,
    Myanmar,
    Oriya,
    Sinhala,
    Syriac,
    Tamil,
    Telugu,
    Thaana,
    Thai,
    Tibetan,
    Yi,
}

static SCRIPT_NAMES: &[(&str, &str, Script)] = &[
    ("common", "zyyy", Script::Common),
    ("inherited", "zinh", Script::Inherited),
    ("arabic", "arab", Script::Arabic),
    ("armenian", "armn", Script::Armenian),
    ("bengali", "beng", Script::Bengali),
    ("bopomofo", "bopo", Script::Bopomofo),
    ("cherokee", "cher", Script::Cherokee),
    ("coptic", "copt", Script::Coptic),
    ("cyrillic", "cyrl", Script::Cyrillic),
    ("devanagari", "deva", Script::Devanagari),
    ("ethiopic", "ethi", Script::Ethiopic),
    ("georgian", "geor", Script::Georgian),
    ("greek", "grek", Script::Greek),
    ("gujarati", "gujr", Script::Gujarati),
    ("gurmukhi", "guru", Script::Gurmukhi),
    ("han", "hani", Script::Han),
    ("hangul", "hang", Script::Hangul),
    ("hebrew", "hebr", Script::Hebrew),
    ("hiragana", "hira", Script::Hiragana),
    ("kannada", "knda", Script::Kannada),
    ("katakana", "kana", Script::Katakana),
    ("khmer", "khmr", Script::Khmer),
    ("lao", "laoo", Script::Lao),
    ("latin", "latn", Script::Latin),
    ("malayalam", "mlym", Script::Malayalam),
    ("mongolian", "mong", Script::Mongolian),
    ("myanmar", "mymr", Script::Myanmar),
    ("oriya", "orya", Script::Oriya),
    ("sinhala", "sinh", Script::Sinhala),
    ("syriac", "syrc", Script::Syriac),
    ("tamil", "taml", Script::Tamil),
    ("telugu", "telu", Script::Telugu),
    ("thaana", "thaa", Script::Thaana),
    ("thai", "thai", Script::Thai),
    ("tibetan", "tibt", Script::Tibetan),
    ("yi", "yiii", Script::Yi),
];

/// Script of `cp`; characters outside the tables count as Common.
pub fn script_of(cp: u32) -> Script {
    if cp < 0x41 {
        return Script::Common;
    }
    SCRIPTS
        .iter()
        .find(|&&(lo, hi, _)| lo <= cp && cp <= hi)
        .map(|&(_, _, s)| s)
        .unwrap_or(Script::Common)
}

// === Properties (\p{..}) ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Any,
    /// L& (cased letter: Lu, Ll or Lt)
    CasedLetter,
    Major(u8),
    Category(GeneralCategory),
    Script(Script),
    /// Alphanumeric: L or N.
    Xan,
    /// Perl space.
    Xsp,
    /// POSIX space.
    Xps,
    /// Perl word: Xan or underscore.
    Xwd,
    /// Characters expressible as a C++ universal character name.
    Xuc,
}

/// Resolve a property name as written inside `\p{..}`.
///
/// Matching is loose: case, spaces, hyphens and underscores are ignored, and
/// `sc=`/`script=`/`gc=` prefixes are accepted.
pub fn property_by_name(name: &str) -> Option<Property> {
    let norm: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(|c| c.to_lowercase())
        .collect();
    let (prefix, body) = match norm.split_once(|c| c == '=' || c == ':') {
        Some((p, b)) => (Some(p), b),
        None => (None, norm.as_str()),
    };
    match prefix {
        Some("sc" | "script" | "scx" | "scriptextensions") => return script_by_name(body),
        Some("gc" | "generalcategory") => return category_by_name(body),
        Some(_) => return None,
        None => {}
    }
    match body {
        "any" => return Some(Property::Any),
        "xan" => return Some(Property::Xan),
        "xsp" => return Some(Property::Xsp),
        "xps" => return Some(Property::Xps),
        "xwd" => return Some(Property::Xwd),
        "xuc" => return Some(Property::Xuc),
        _ => {}
    }
    category_by_name(body).or_else(|| script_by_name(body))
}

fn category_by_name(name: &str) -> Option<Property> {
    match name {
        "l&" | "lc" => Some(Property::CasedLetter),
        "l" | "m" | "n" | "p" | "s" | "z" | "c" => {
            Some(Property::Major(name.as_bytes()[0].to_ascii_uppercase()))
        }
        _ => GeneralCategory::from_name(name).map(Property::Category),
    }
}

fn script_by_name(name: &str) -> Option<Property> {
    SCRIPT_NAMES
        .iter()
        .find(|&&(long, short, _)| long == name || short == name)
        .map(|&(_, _, s)| Property::Script(s))
}

/// Does `cp` have property `prop`?
pub fn has_property(cp: u32, prop: Property) -> bool {
    match prop {
        Property::Any => true,
        Property::CasedLetter => matches!(
            general_category(cp),
            GeneralCategory::Lu | GeneralCategory::Ll | GeneralCategory::Lt
        ),
        Property::Major(m) => general_category(cp).major() == m,
        Property::Category(gc) => general_category(cp) == gc,
        Property::Script(s) => script_of(cp) == s,
        Property::Xan => matches!(general_category(cp).major(), b'L' | b'N'),
        Property::Xsp | Property::Xps => is_space(cp, true),
        Property::Xwd => cp == 0x5f || matches!(general_category(cp).major(), b'L' | b'N'),
        Property::Xuc => {
            cp == 0x24 || cp == 0x40 || cp == 0x60 || (cp >= 0xa0 && !(0xd800..=0xdfff).contains(&cp))
        }
    }
}

// === Perl class predicates ===

#[inline]
fn ascii_ctype(cp: u32, mask: u16) -> bool {
    cp < 128 && ASCII_CTYPE_TABLE[cp as usize] & mask != 0
}

/// `\w`: ASCII word characters, or Unicode L/N/Mn/Pc under UCP.
pub fn is_word(cp: u32, ucp: bool) -> bool {
    if cp < 128 || !ucp {
        return ascii_ctype(cp, CTYPE_WORD);
    }
    use GeneralCategory::*;
    let gc = general_category(cp);
    matches!(gc.major(), b'L' | b'N') || gc == Mn || gc == Pc
}

/// `\d`: ASCII digits, or any Nd under UCP.
pub fn is_digit(cp: u32, ucp: bool) -> bool {
    if cp < 128 || !ucp {
        return ascii_ctype(cp, CTYPE_DIGIT);
    }
    is_decimal(cp)
}

/// `\s`: ASCII white space (including VT), or Z plus `\h`/`\v` under UCP.
pub fn is_space(cp: u32, ucp: bool) -> bool {
    if cp < 128 || !ucp {
        return ascii_ctype(cp, CTYPE_SPACE);
    }
    is_hspace(cp) || is_vspace(cp) || general_category(cp).major() == b'Z'
}

/// `\h`: horizontal white space. Always Unicode-aware.
pub fn is_hspace(cp: u32) -> bool {
    HSPACE.contains(&cp)
}

/// `\v`: vertical white space. Always Unicode-aware.
pub fn is_vspace(cp: u32) -> bool {
    VSPACE.contains(&cp)
}

// === POSIX classes ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosixClass {
    Alnum,
    Alpha,
    Ascii,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Word,
    Xdigit,
}

impl PosixClass {
    pub fn from_name(name: &str) -> Option<PosixClass> {
        Some(match name {
            "alnum" => PosixClass::Alnum,
            "alpha" => PosixClass::Alpha,
            "ascii" => PosixClass::Ascii,
            "blank" => PosixClass::Blank,
            "cntrl" => PosixClass::Cntrl,
            "digit" => PosixClass::Digit,
            "graph" => PosixClass::Graph,
            "lower" => PosixClass::Lower,
            "print" => PosixClass::Print,
            "punct" => PosixClass::Punct,
            "space" => PosixClass::Space,
            "upper" => PosixClass::Upper,
            "word" => PosixClass::Word,
            "xdigit" => PosixClass::Xdigit,
            _ => return None,
        })
    }

    /// Membership test. Under UCP most classes switch to Unicode properties;
    /// `ascii` and `xdigit` never do.
    pub fn matches(self, cp: u32, ucp: bool) -> bool {
        use GeneralCategory::*;
        if !ucp || cp < 128 {
            let mask = match self {
                PosixClass::Alnum => CTYPE_ALNUM,
                PosixClass::Alpha => CTYPE_ALPHA,
                PosixClass::Ascii => CTYPE_ASCII,
                PosixClass::Blank => CTYPE_BLANK,
                PosixClass::Cntrl => CTYPE_CNTRL,
                PosixClass::Digit => CTYPE_DIGIT,
                PosixClass::Graph => CTYPE_GRAPH,
                PosixClass::Lower => CTYPE_LOWER,
                PosixClass::Print => CTYPE_PRINT,
                PosixClass::Punct => CTYPE_PUNCT,
                PosixClass::Space => CTYPE_SPACE,
                PosixClass::Upper => CTYPE_UPPER,
                PosixClass::Word => CTYPE_WORD,
                PosixClass::Xdigit => CTYPE_XDIGIT,
            };
            return ascii_ctype(cp, mask);
        }
        let gc = general_category(cp);
        match self {
            PosixClass::Alnum => has_property(cp, Property::Xan),
            PosixClass::Alpha => gc.major() == b'L',
            PosixClass::Ascii | PosixClass::Xdigit => false,
            PosixClass::Blank => is_hspace(cp),
            PosixClass::Cntrl => gc == Cc,
            PosixClass::Digit => gc == Nd,
            PosixClass::Lower => gc == Ll,
            PosixClass::Upper => gc == Lu,
            PosixClass::Space => has_property(cp, Property::Xps),
            PosixClass::Word => has_property(cp, Property::Xwd),
            PosixClass::Graph => !matches!(gc.major(), b'Z' | b'C') || is_graph_format(cp, gc),
            PosixClass::Print => {
                (!matches!(gc.major(), b'Z' | b'C') || is_graph_format(cp, gc)) || gc == Zs
            }
            // Above ASCII, PCRE2 counts no characters as punct.
            PosixClass::Punct => false,
        }
    }
}

fn is_graph_format(cp: u32, gc: GeneralCategory) -> bool {
    gc == GeneralCategory::Cf
        && cp != 0x061c
        && cp != 0x180e
        && !(0x2066..=0x2069).contains(&cp)
}

// === Case folding ===

fn single_upper(ch: char) -> char {
    let mut it = ch.to_uppercase();
    match (it.next(), it.next()) {
        (Some(u), None) => u,
        _ => ch,
    }
}

fn single_lower(ch: char) -> char {
    let mut it = ch.to_lowercase();
    match (it.next(), it.next()) {
        (Some(l), None) => l,
        _ => ch,
    }
}

/// Simple case fold. Without `unicode` folding, only ASCII letters fold.
pub fn fold(cp: u32, unicode: bool) -> u32 {
    if cp < 128 {
        return if (0x41..=0x5a).contains(&cp) { cp + 0x20 } else { cp };
    }
    if !unicode || cp == 0x130 || cp == 0x131 {
        return cp;
    }
    match char::from_u32(cp) {
        Some(ch) => single_lower(single_upper(ch)) as u32,
        None => cp,
    }
}

/// All characters that match `cp` caselessly, `cp` included.
pub fn case_variants(cp: u32, unicode: bool) -> SmallVec<[u32; 4]> {
    let mut out: SmallVec<[u32; 4]> = SmallVec::new();
    out.push(cp);
    let f = fold(cp, unicode);
    let add = |c: u32, out: &mut SmallVec<[u32; 4]>| {
        if !out.contains(&c) {
            out.push(c);
        }
    };
    add(f, &mut out);
    if f < 128 {
        if (0x61..=0x7a).contains(&f) {
            add(f - 0x20, &mut out);
        }
        if !unicode {
            return out;
        }
    } else if !unicode {
        return out;
    }
    if let Some(ch) = char::from_u32(f) {
        add(single_upper(ch) as u32, &mut out);
    }
    for &(base, other) in EXTRA_CASE {
        if base == f {
            add(other, &mut out);
        }
    }
    out
}

// === Grapheme helpers (\X) ===

pub fn is_grapheme_extend(cp: u32) -> bool {
    cp == 0x200d
        || (0x1f3fb..=0x1f3ff).contains(&cp)
        || matches!(
            general_category(cp),
            GeneralCategory::Mn | GeneralCategory::Me | GeneralCategory::Mc
        )
}

pub fn is_regional_indicator(cp: u32) -> bool {
    (0x1f1e6..=0x1f1ff).contains(&cp)
}

pub fn is_extended_pictographic(cp: u32) -> bool {
    (0x2600..=0x27bf).contains(&cp) || (0x1f000..=0x1faff).contains(&cp)
}

/// Characters that attach to the character after them.
pub fn is_prepend(cp: u32) -> bool {
    in_ranges(PREPEND, cp)
}

/// Hangul syllable type, for the jamo sequence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hangul {
    L,
    V,
    T,
    Lv,
    Lvt,
}

pub fn hangul_type(cp: u32) -> Option<Hangul> {
    match cp {
        0x1100..=0x115f | 0xa960..=0xa97c => Some(Hangul::L),
        0x1160..=0x11a7 | 0xd7b0..=0xd7c6 => Some(Hangul::V),
        0x11a8..=0x11ff | 0xd7cb..=0xd7fb => Some(Hangul::T),
        0xac00..=0xd7a3 if (cp - 0xac00) % 28 == 0 => Some(Hangul::Lv),
        0xac00..=0xd7a3 => Some(Hangul::Lvt),
        _ => None,
    }
}

/// Whether jamo `b` continues the syllable ending in `a`.
pub fn hangul_joins(a: Hangul, b: Hangul) -> bool {
    use Hangul::*;
    matches!((a, b), (L, L | V | Lv | Lvt) | (Lv | V, V | T) | (Lvt | T, T))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        use GeneralCategory::*;
        assert_eq!(general_category('A' as u32), Lu);
        assert_eq!(general_category('z' as u32), Ll);
        assert_eq!(general_category('5' as u32), Nd);
        assert_eq!(general_category(0x0663), Nd);
        assert_eq!(general_category(0x2163), Nl);
        assert_eq!(general_category(0xbd), No);
        assert_eq!(general_category(' ' as u32), Zs);
        assert_eq!(general_category('\n' as u32), Cc);
        assert_eq!(general_category(0x0301), Mn);
        assert_eq!(general_category(0x01c5), Lt);
        assert_eq!(general_category(0x02b0), Lm);
        assert_eq!(general_category(0x4e00), Lo);
        assert_eq!(general_category('$' as u32), Sc);
        assert_eq!(general_category(0x20ac), Sc);
        assert_eq!(general_category('(' as u32), Ps);
        assert_eq!(general_category(')' as u32), Pe);
        assert_eq!(general_category(0x300a), Ps);
        assert_eq!(general_category(0x300b), Pe);
        assert_eq!(general_category('_' as u32), Pc);
        assert_eq!(general_category('+' as u32), Sm);
        assert_eq!(general_category(0x2603), So);
        assert_eq!(general_category(0xe000), Co);
        assert_eq!(general_category(0xd800), Cs);
        assert_eq!(general_category(0xaa), Lo);
    }

    #[test]
    fn scripts() {
        assert_eq!(script_of('a' as u32), Script::Latin);
        assert_eq!(script_of(0x3b1), Script::Greek);
        assert_eq!(script_of(0x416), Script::Cyrillic);
        assert_eq!(script_of(0x3042), Script::Hiragana);
        assert_eq!(script_of(0x4e2d), Script::Han);
        assert_eq!(script_of('1' as u32), Script::Common);
        assert_eq!(script_of(0x301), Script::Inherited);
    }

    #[test]
    fn property_names() {
        assert_eq!(property_by_name("L"), Some(Property::Major(b'L')));
        assert_eq!(property_by_name("Lu"), Some(Property::Category(GeneralCategory::Lu)));
        assert_eq!(property_by_name("L&"), Some(Property::CasedLetter));
        assert_eq!(property_by_name("Greek"), Some(Property::Script(Script::Greek)));
        assert_eq!(property_by_name("sc=Grek"), Some(Property::Script(Script::Greek)));
        assert_eq!(property_by_name("Old_Hungarian_Runes"), None);
        assert_eq!(property_by_name("xan"), Some(Property::Xan));
    }

    #[test]
    fn ucp_switches_classes() {
        assert!(!is_word(0xe9, false));
        assert!(is_word(0xe9, true));
        assert!(!is_digit(0x0663, false));
        assert!(is_digit(0x0663, true));
        assert!(is_space(0x0b, false));
        assert!(is_space(0x3000, true));
        assert!(!is_space(0x3000, false));
    }

    #[test]
    fn posix() {
        assert!(PosixClass::Alpha.matches('q' as u32, false));
        assert!(!PosixClass::Alpha.matches(0xe9, false));
        assert!(PosixClass::Alpha.matches(0xe9, true));
        assert!(PosixClass::Xdigit.matches('F' as u32, true));
        assert!(PosixClass::Punct.matches('!' as u32, false));
        assert_eq!(PosixClass::from_name("bogus"), None);
    }

    #[test]
    fn folding() {
        assert_eq!(fold('A' as u32, false), 'a' as u32);
        assert_eq!(fold(0xc9, false), 0xc9);
        assert_eq!(fold(0xc9, true), 0xe9);
        assert_eq!(fold(0x212a, true), 'k' as u32);
        assert_eq!(fold(0x17f, true), 's' as u32);
        assert_eq!(fold(0x3c2, true), 0x3c3);
        assert_eq!(fold(0x131, true), 0x131);
        let v = case_variants('k' as u32, true);
        assert!(v.contains(&('K' as u32)));
        assert!(v.contains(&0x212a));
        let v = case_variants('k' as u32, false);
        assert_eq!(v.as_slice(), &['k' as u32, 'K' as u32]);
    }

    #[test]
    fn unassigned_code_points() {
        assert_eq!(general_category(0x0378), GeneralCategory::Cn);
        assert_eq!(general_category(0x05ff), GeneralCategory::Cn);
        assert_eq!(general_category(0x50000), GeneralCategory::Cn);
        assert!(has_property(0x0378, Property::Category(GeneralCategory::Cn)));
        assert_ne!(general_category(0x0377), GeneralCategory::Cn);
        assert_ne!(general_category(0x05d0), GeneralCategory::Cn);
    }

    #[test]
    fn hangul_syllables() {
        assert_eq!(hangul_type(0x1100), Some(Hangul::L));
        assert_eq!(hangul_type(0x1161), Some(Hangul::V));
        assert_eq!(hangul_type(0x11a8), Some(Hangul::T));
        assert_eq!(hangul_type(0xac00), Some(Hangul::Lv));
        assert_eq!(hangul_type(0xac01), Some(Hangul::Lvt));
        assert_eq!(hangul_type('a' as u32), None);
        assert!(hangul_joins(Hangul::L, Hangul::V));
        assert!(hangul_joins(Hangul::Lv, Hangul::T));
        assert!(!hangul_joins(Hangul::T, Hangul::V));
        assert!(is_prepend(0x0600));
    }

    #[test]
    fn posix_space_agrees_with_perl_space() {
        for cp in [0x09, 0x0b, 0x20, 0x85, 0xa0, 0x2028, 0x3000] {
            assert!(is_space(cp, true), "{:#x}", cp);
            assert!(PosixClass::Space.matches(cp, true), "{:#x}", cp);
            assert!(has_property(cp, Property::Xsp), "{:#x}", cp);
        }
        assert!(!PosixClass::Space.matches('a' as u32, true));
    }

    #[test]
    fn horizontal_vertical() {
        assert!(is_hspace(0x09));
        assert!(is_hspace(0x202f));
        assert!(!is_hspace(0x0a));
        assert!(is_vspace(0x2028));
    }
}
