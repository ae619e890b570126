//! Static Morse code table
//!
//! One-way decode is all the core needs; the reverse direction exists so
//! tests can round-trip every entry.

use heapless::FnvIndexMap;

/// Result of a code lookup
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded {
    /// A printable character, lowercase/unshifted form
    Char(char),
    /// Shift latch: the next character is emitted shifted
    Shift,
    /// Correction sign: erase one character
    Backspace,
}

/// Code that arms the shift latch (no standard assignment)
pub const SHIFT_CODE: &str = "----";
/// Error/correction sign, eight dots
pub const BACKSPACE_CODE: &str = "........";

const CODES: &[(&str, Decoded)] = &[
    // Letters
    (".-", Decoded::Char('a')),
    ("-...", Decoded::Char('b')),
    ("-.-.", Decoded::Char('c')),
    ("-..", Decoded::Char('d')),
    (".", Decoded::Char('e')),
    ("..-.", Decoded::Char('f')),
    ("--.", Decoded::Char('g')),
    ("....", Decoded::Char('h')),
    ("..", Decoded::Char('i')),
    (".---", Decoded::Char('j')),
    ("-.-", Decoded::Char('k')),
    (".-..", Decoded::Char('l')),
    ("--", Decoded::Char('m')),
    ("-.", Decoded::Char('n')),
    ("---", Decoded::Char('o')),
    (".--.", Decoded::Char('p')),
    ("--.-", Decoded::Char('q')),
    (".-.", Decoded::Char('r')),
    ("...", Decoded::Char('s')),
    ("-", Decoded::Char('t')),
    ("..-", Decoded::Char('u')),
    ("...-", Decoded::Char('v')),
    (".--", Decoded::Char('w')),
    ("-..-", Decoded::Char('x')),
    ("-.--", Decoded::Char('y')),
    ("--..", Decoded::Char('z')),
    // Digits
    (".----", Decoded::Char('1')),
    ("..---", Decoded::Char('2')),
    ("...--", Decoded::Char('3')),
    ("....-", Decoded::Char('4')),
    (".....", Decoded::Char('5')),
    ("-....", Decoded::Char('6')),
    ("--...", Decoded::Char('7')),
    ("---..", Decoded::Char('8')),
    ("----.", Decoded::Char('9')),
    ("-----", Decoded::Char('0')),
    // Punctuation
    (".-.-.-", Decoded::Char('.')),
    ("--..--", Decoded::Char(',')),
    ("..--..", Decoded::Char('?')),
    ("-..-.", Decoded::Char('/')),
    ("-...-", Decoded::Char('=')),
    (".-.-.", Decoded::Char('+')),
    ("-....-", Decoded::Char('-')),
    (".--.-.", Decoded::Char('@')),
    ("-.-.--", Decoded::Char('!')),
    (".----.", Decoded::Char('\'')),
    ("-.--.", Decoded::Char('(')),
    ("-.--.-", Decoded::Char(')')),
    (".-...", Decoded::Char('&')),
    ("---...", Decoded::Char(':')),
    ("-.-.-.", Decoded::Char(';')),
    (".-..-.", Decoded::Char('"')),
    ("...-..-", Decoded::Char('$')),
    ("..--.-", Decoded::Char('_')),
    // Control codes
    (SHIFT_CODE, Decoded::Shift),
    (BACKSPACE_CODE, Decoded::Backspace),
];

/// Dot/dash sequence to character mapping, indexed once at startup
pub struct CodeTable {
    map: FnvIndexMap<&'static str, Decoded, 64>,
}

impl CodeTable {
    pub fn new() -> Self {
        let mut map = FnvIndexMap::new();
        for &(code, decoded) in CODES {
            let _ = map.insert(code, decoded);
        }
        Self { map }
    }

    /// Looks up a dot/dash string. Unknown codes yield `None`, never an
    /// error; the boundary detector silently ignores them.
    pub fn decode(&self, code: &str) -> Option<Decoded> {
        self.map.get(code).copied()
    }

    /// Reverse lookup, for round-trip testing
    pub fn encode(&self, decoded: Decoded) -> Option<&'static str> {
        CODES.iter().find(|&&(_, d)| d == decoded).map(|&(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}
