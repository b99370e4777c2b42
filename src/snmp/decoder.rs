//! Table Decoder - turns raw walk output into typed per-index column maps
//!
//! Input is the line-oriented text printed by the net-snmp tools with numeric
//! OIDs: `.<oid> = <TypeTag>: <value>`. Agents are inconsistent about type
//! tags (a MAC may arrive as `Hex-STRING` or as a quoted `STRING`), so values
//! are coerced by the declared column kind rather than by the raw tag.
//!
//! Decoding never fails. Lines that do not match the grammar, that fall
//! outside the table prefix, or that belong to undeclared columns are skipped.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

lazy_static! {
    static ref LINE_PATTERN: Regex =
        Regex::new(r"^\.?((?:\d+\.)*\d+)\s*=\s*([A-Za-z][A-Za-z0-9\- ]*?):\s?(.*)$").unwrap();
    static ref HEX_CONTINUATION: Regex = Regex::new(r"^(?:[0-9A-Fa-f]{2}\s*)+$").unwrap();
    static ref ENUM_LITERAL: Regex = Regex::new(r"^[A-Za-z][\w\-]*\((-?\d+)\)").unwrap();
    static ref FIRST_NUMBER: Regex = Regex::new(r"-?\d+").unwrap();
}

/// Raw value family as reported by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    String,
    HexString,
    Integer,
    Counter,
}

impl ValueType {
    /// Map a net-snmp type tag onto a value family
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "Hex-STRING" => ValueType::HexString,
            "INTEGER" => ValueType::Integer,
            "Counter32" | "Counter64" | "Gauge32" | "Timeticks" | "Unsigned32" | "UInteger32" => {
                ValueType::Counter
            }
            _ => ValueType::String,
        }
    }
}

/// One parsed line of walk output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidTableRow {
    /// Column number directly below the table entry OID
    pub column: u32,
    /// Remaining dotted suffix: an integer for ifTable, an IPv4 address for ipAddrTable
    pub index: String,
    pub value_type: ValueType,
    pub raw_value: String,
}

impl OidTableRow {
    /// Integer table index, when the suffix is a single component
    pub fn table_index(&self) -> Option<u32> {
        self.index.parse().ok()
    }
}

/// How a column's literal is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    MacAddress,
    Integer,
    Counter,
}

/// One declared column of a table
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub id: u32,
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn new(id: u32, name: &'static str, kind: ColumnKind) -> Self {
        Self { id, name, kind }
    }
}

/// OID prefix of a table entry plus the columns to keep
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub prefix: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub fn column(&self, id: u32) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// A coerced cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Text(String),
    Integer(i64),
    Counter(u64),
}

impl DecodedValue {
    pub fn as_text(&self) -> String {
        match self {
            DecodedValue::Text(s) => s.clone(),
            DecodedValue::Integer(n) => n.to_string(),
            DecodedValue::Counter(n) => n.to_string(),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            DecodedValue::Text(s) => parse_leading_integer(s),
            DecodedValue::Integer(n) => *n,
            DecodedValue::Counter(n) => i64::try_from(*n).unwrap_or(i64::MAX),
        }
    }

    pub fn as_u64(&self) -> u64 {
        match self {
            DecodedValue::Text(s) => parse_leading_counter(s),
            DecodedValue::Integer(n) => u64::try_from(*n).unwrap_or(0),
            DecodedValue::Counter(n) => *n,
        }
    }
}

/// Decoded table: column name -> (index -> value)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTable {
    columns: HashMap<&'static str, BTreeMap<String, DecodedValue>>,
}

impl DecodedTable {
    fn for_spec(spec: &TableSpec) -> Self {
        Self {
            columns: spec.columns.iter().map(|c| (c.name, BTreeMap::new())).collect(),
        }
    }

    /// All cells of one column, keyed by raw index suffix
    pub fn column(&self, name: &str) -> Option<&BTreeMap<String, DecodedValue>> {
        self.columns.get(name)
    }

    /// True when the column is undeclared or decoded no cells
    pub fn is_column_empty(&self, name: &str) -> bool {
        self.column(name).map_or(true, |c| c.is_empty())
    }

    /// Replace one column wholesale (used by the single-column fallback walk)
    pub fn replace_column(&mut self, name: &'static str, cells: BTreeMap<String, DecodedValue>) {
        self.columns.insert(name, cells);
    }

    /// Text cells keyed by integer table index
    pub fn text_by_index(&self, name: &str) -> BTreeMap<u32, String> {
        self.by_index(name, DecodedValue::as_text)
    }

    /// Integer cells keyed by integer table index
    pub fn integer_by_index(&self, name: &str) -> BTreeMap<u32, i64> {
        self.by_index(name, DecodedValue::as_i64)
    }

    /// Counter cells keyed by integer table index
    pub fn counter_by_index(&self, name: &str) -> BTreeMap<u32, u64> {
        self.by_index(name, DecodedValue::as_u64)
    }

    fn by_index<T, F>(&self, name: &str, convert: F) -> BTreeMap<u32, T>
    where
        F: Fn(&DecodedValue) -> T,
    {
        self.column(name)
            .map(|cells| {
                cells
                    .iter()
                    .filter_map(|(index, value)| index.parse::<u32>().ok().map(|i| (i, convert(value))))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of cells over all columns
    pub fn cell_count(&self) -> usize {
        self.columns.values().map(BTreeMap::len).sum()
    }
}

/// Decoder bound to one table layout
#[derive(Debug, Clone, Copy)]
pub struct TableDecoder {
    spec: &'static TableSpec,
}

impl TableDecoder {
    pub fn new(spec: &'static TableSpec) -> Self {
        Self { spec }
    }

    /// Parse raw walk output into rows of this table, keeping only declared columns
    pub fn parse_rows(&self, raw: &str) -> Vec<OidTableRow> {
        let mut rows: Vec<OidTableRow> = Vec::new();
        let mut in_table = false;
        let mut open_quote = false;

        for line in raw.lines() {
            let trimmed = line.trim();

            if let Some(caps) = LINE_PATTERN.captures(trimmed) {
                open_quote = false;
                in_table = false;

                let oid = &caps[1];
                let Some((column, index)) = self.split_oid(oid) else {
                    continue;
                };
                if self.spec.column(column).is_none() {
                    continue;
                }

                let literal = caps[3].trim_end().to_string();
                let value_type = ValueType::from_tag(&caps[2]);
                open_quote = value_type == ValueType::String && is_unterminated_quote(&literal);
                in_table = true;

                rows.push(OidTableRow {
                    column,
                    index: index.to_string(),
                    value_type,
                    raw_value: literal,
                });
                continue;
            }

            // Long values wrap onto following lines
            if !in_table || trimmed.is_empty() {
                continue;
            }
            if let Some(last) = rows.last_mut() {
                if last.value_type == ValueType::HexString && HEX_CONTINUATION.is_match(trimmed) {
                    last.raw_value.push(' ');
                    last.raw_value.push_str(trimmed);
                } else if open_quote {
                    last.raw_value.push('\n');
                    last.raw_value.push_str(line.trim_end());
                    open_quote = is_unterminated_quote(&last.raw_value);
                }
            }
        }

        rows
    }

    /// Decode raw walk output into column -> index -> value
    pub fn decode(&self, raw: &str) -> DecodedTable {
        let mut table = DecodedTable::for_spec(self.spec);

        for row in self.parse_rows(raw) {
            let Some(column) = self.spec.column(row.column) else {
                continue;
            };
            let value = coerce(column.kind, row.value_type, &row.raw_value);
            if let Some(cells) = table.columns.get_mut(column.name) {
                // Agents that break lexicographic order may repeat rows; first one wins
                cells.entry(row.index).or_insert(value);
            }
        }

        table
    }

    /// Split `<prefix>.<column>.<index>` into its parts
    fn split_oid<'a>(&self, oid: &'a str) -> Option<(u32, &'a str)> {
        let rest = oid.strip_prefix(self.spec.prefix)?.strip_prefix('.')?;
        let (column, index) = rest.split_once('.')?;
        if index.is_empty() {
            return None;
        }
        Some((column.parse().ok()?, index))
    }
}

/// Decode raw walk output for one table layout
pub fn decode(raw: &str, spec: &'static TableSpec) -> DecodedTable {
    TableDecoder::new(spec).decode(raw)
}

/// A single value answered to a GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarValue {
    pub value_type: ValueType,
    pub literal: String,
}

impl ScalarValue {
    /// Value as display text (quotes stripped, hex octets decoded)
    pub fn text(&self) -> String {
        coerce_text(self.value_type, &self.literal)
    }

    /// Numeric value, if the literal carries one
    pub fn integer(&self) -> Option<i64> {
        let literal = self.literal.trim();
        if let Some(caps) = ENUM_LITERAL.captures(literal) {
            return caps[1].parse().ok();
        }
        FIRST_NUMBER.find(literal).and_then(|m| m.as_str().parse().ok())
    }
}

/// Pick the value of `oid` out of a GET response; agent error values
/// ("No Such Object", "No Such Instance") yield `None`
pub fn decode_scalar(raw: &str, oid: &str) -> Option<ScalarValue> {
    let wanted = oid.trim_start_matches('.');
    scan_values(raw, |line_oid| line_oid == wanted).into_iter().next()
}

/// Every value under `root`, in output order
pub fn subtree_values(raw: &str, root: &str) -> Vec<ScalarValue> {
    let root = root.trim_start_matches('.');
    scan_values(raw, |line_oid| {
        line_oid
            .strip_prefix(root)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('.'))
    })
}

fn scan_values<F>(raw: &str, wanted: F) -> Vec<ScalarValue>
where
    F: Fn(&str) -> bool,
{
    let mut values = Vec::new();
    let mut lines = raw.lines().map(str::trim).peekable();

    while let Some(line) = lines.next() {
        let Some(caps) = LINE_PATTERN.captures(line) else {
            continue;
        };
        if !wanted(&caps[1]) {
            continue;
        }

        let value_type = ValueType::from_tag(&caps[2]);
        let mut literal = caps[3].trim_end().to_string();

        while value_type == ValueType::String && is_unterminated_quote(&literal) {
            match lines.next() {
                Some(next) => {
                    literal.push('\n');
                    literal.push_str(next);
                }
                None => break,
            }
        }
        while value_type == ValueType::HexString {
            match lines.peek() {
                Some(next) if HEX_CONTINUATION.is_match(next) => {
                    literal.push(' ');
                    literal.push_str(next);
                    lines.next();
                }
                _ => break,
            }
        }

        values.push(ScalarValue { value_type, literal });
    }

    values
}

/// Apply column semantics to a raw literal
pub fn coerce(kind: ColumnKind, value_type: ValueType, literal: &str) -> DecodedValue {
    match kind {
        ColumnKind::Text => DecodedValue::Text(coerce_text(value_type, literal)),
        ColumnKind::MacAddress => DecodedValue::Text(coerce_mac(value_type, literal)),
        ColumnKind::Integer => DecodedValue::Integer(parse_leading_integer(literal)),
        ColumnKind::Counter => DecodedValue::Counter(parse_leading_counter(literal)),
    }
}

fn coerce_text(value_type: ValueType, literal: &str) -> String {
    match value_type {
        ValueType::HexString => decode_hex_text(literal).unwrap_or_else(|| literal.trim().to_string()),
        _ => {
            let text = strip_quotes(literal);
            if let Some(hex) = text.strip_prefix("0x") {
                if is_hex_blob(hex) {
                    if let Some(decoded) = decode_hex_text(hex) {
                        return decoded;
                    }
                }
            }
            text
        }
    }
}

/// Canonical lower-case colon-separated six-octet MAC, or empty
fn coerce_mac(value_type: ValueType, literal: &str) -> String {
    match value_type {
        ValueType::HexString => canonical_mac(literal.split_whitespace()),
        ValueType::String => {
            let text = strip_quotes(literal);
            if text.contains(':') {
                canonical_mac(text.split(':'))
            } else {
                String::new()
            }
        }
        ValueType::Integer | ValueType::Counter => String::new(),
    }
}

fn canonical_mac<'a, I>(octets: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut parts = Vec::with_capacity(6);
    for octet in octets {
        let octet = octet.trim();
        if octet.is_empty() || octet.len() > 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
            return String::new();
        }
        parts.push(format!("{:0>2}", octet.to_ascii_lowercase()));
    }
    if parts.len() == 6 {
        parts.join(":")
    } else {
        String::new()
    }
}

/// Remove one pair of surrounding double quotes
pub fn strip_quotes(literal: &str) -> String {
    let s = literal.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn is_unterminated_quote(literal: &str) -> bool {
    let s = literal.trim();
    s.starts_with('"') && (s.len() == 1 || !s.ends_with('"'))
}

fn is_hex_blob(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Decode hex octets (space separated or packed) to text
fn decode_hex_text(literal: &str) -> Option<String> {
    let packed: String = literal.split_whitespace().collect();
    if packed.is_empty() {
        return Some(String::new());
    }
    if !is_hex_blob(&packed) {
        return None;
    }

    let bytes: Vec<u8> = (0..packed.len())
        .step_by(2)
        .filter_map(|i| u8::from_str_radix(&packed[i..i + 2], 16).ok())
        .collect();

    Some(String::from_utf8_lossy(&bytes).trim_end_matches('\0').to_string())
}

/// Leading decimal token of a literal; `up(1)` yields 1, anything else 0
pub fn parse_leading_integer(literal: &str) -> i64 {
    leading_token(literal).and_then(|tok| tok.parse().ok()).unwrap_or(0)
}

/// Unsigned flavour of [`parse_leading_integer`], covering the full Counter64 range
pub fn parse_leading_counter(literal: &str) -> u64 {
    leading_token(literal).and_then(|tok| tok.parse().ok()).unwrap_or(0)
}

fn leading_token(literal: &str) -> Option<&str> {
    let s = literal.trim();
    if let Some(caps) = ENUM_LITERAL.captures(s) {
        return caps.get(1).map(|m| m.as_str());
    }
    s.split_whitespace()
        .next()
        .map(|tok| tok.trim_matches(|c| c == '(' || c == ')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::oids::{IF_TABLE, IF_X_TABLE, IP_ADDR_TABLE};

    #[test]
    fn test_hex_mac_is_colon_separated() {
        let raw = ".1.3.6.1.2.1.2.2.1.6.1 = Hex-STRING: b0 7d 47 f5 c7 31 \n";
        let table = decode(raw, &IF_TABLE);
        assert_eq!(table.text_by_index("ifPhysAddress")[&1], "b0:7d:47:f5:c7:31");
    }

    #[test]
    fn test_uppercase_hex_mac_is_lowercased() {
        let raw = ".1.3.6.1.2.1.2.2.1.6.3 = Hex-STRING: 00 1A 2B 3C 4D 5E";
        let table = decode(raw, &IF_TABLE);
        assert_eq!(table.text_by_index("ifPhysAddress")[&3], "00:1a:2b:3c:4d:5e");
    }

    #[test]
    fn test_string_mac_kept_when_colon_separated() {
        let raw = concat!(
            ".1.3.6.1.2.1.2.2.1.6.1 = STRING: \"b0:7d:47:f5:c7:31\"\n",
            ".1.3.6.1.2.1.2.2.1.6.2 = STRING: 0:1b:2c:3d:4e:5f\n",
            ".1.3.6.1.2.1.2.2.1.6.3 = STRING: \"\"\n",
            ".1.3.6.1.2.1.2.2.1.6.4 = STRING: \"garbage\"\n",
        );
        let macs = decode(raw, &IF_TABLE).text_by_index("ifPhysAddress");
        assert_eq!(macs[&1], "b0:7d:47:f5:c7:31");
        assert_eq!(macs[&2], "00:1b:2c:3d:4e:5f");
        assert_eq!(macs[&3], "");
        assert_eq!(macs[&4], "");
    }

    #[test]
    fn test_empty_hex_mac_is_empty() {
        let raw = ".1.3.6.1.2.1.2.2.1.6.9 = Hex-STRING: \n";
        let macs = decode(raw, &IF_TABLE).text_by_index("ifPhysAddress");
        assert_eq!(macs[&9], "");
    }

    #[test]
    fn test_string_column_strips_quotes() {
        let raw = ".1.3.6.1.2.1.2.2.1.2.10101 = STRING: \"GigabitEthernet1/0/1\"";
        let descr = decode(raw, &IF_TABLE).text_by_index("ifDescr");
        assert_eq!(descr[&10101], "GigabitEthernet1/0/1");
    }

    #[test]
    fn test_integer_columns() {
        let raw = concat!(
            ".1.3.6.1.2.1.2.2.1.7.1 = INTEGER: 1\n",
            ".1.3.6.1.2.1.2.2.1.8.1 = INTEGER: down(2)\n",
            ".1.3.6.1.2.1.2.2.1.8.2 = INTEGER: bogus\n",
        );
        let table = decode(raw, &IF_TABLE);
        assert_eq!(table.integer_by_index("ifAdminStatus")[&1], 1);
        assert_eq!(table.integer_by_index("ifOperStatus")[&1], 2);
        assert_eq!(table.integer_by_index("ifOperStatus")[&2], 0);
    }

    #[test]
    fn test_counter_columns() {
        let raw = concat!(
            ".1.3.6.1.2.1.31.1.1.1.15.1 = Gauge32: 1000\n",
            ".1.3.6.1.2.1.31.1.1.1.6.1 = Counter64: 18446744073709551615\n",
            ".1.3.6.1.2.1.31.1.1.1.10.1 = Counter64: n/a\n",
        );
        let table = decode(raw, &IF_X_TABLE);
        assert_eq!(table.counter_by_index("ifHighSpeed")[&1], 1000);
        assert_eq!(table.counter_by_index("ifHCInOctets")[&1], u64::MAX);
        assert_eq!(table.counter_by_index("ifHCOutOctets")[&1], 0);
    }

    #[test]
    fn test_unknown_columns_and_foreign_lines_dropped() {
        let raw = concat!(
            ".1.3.6.1.2.1.2.2.1.3.1 = INTEGER: 6\n",
            ".1.3.6.1.2.1.31.1.1.1.1.1 = STRING: \"Gi1\"\n",
            "garbage line\n",
            ".1.3.6.1.2.1.2.2.1.2.1 = STRING: \"eth0\"\n",
        );
        let table = decode(raw, &IF_TABLE);
        assert_eq!(table.cell_count(), 1);
        assert!(table.column("ifType").is_none());
        assert_eq!(table.text_by_index("ifDescr")[&1], "eth0");
    }

    #[test]
    fn test_declared_columns_exist_even_when_empty() {
        let table = decode("", &IF_TABLE);
        assert!(table.column("ifPhysAddress").is_some());
        assert!(table.is_column_empty("ifPhysAddress"));
    }

    #[test]
    fn test_oid_without_leading_dot() {
        let raw = "1.3.6.1.2.1.2.2.1.2.5 = STRING: \"lo\"";
        assert_eq!(decode(raw, &IF_TABLE).text_by_index("ifDescr")[&5], "lo");
    }

    #[test]
    fn test_ip_table_indexed_by_address() {
        let raw = concat!(
            ".1.3.6.1.2.1.4.20.1.2.10.0.0.1 = INTEGER: 3\n",
            ".1.3.6.1.2.1.4.20.1.3.10.0.0.1 = IpAddress: 255.255.255.0\n",
        );
        let table = decode(raw, &IP_ADDR_TABLE);
        let if_index = table.column("ipAdEntIfIndex").unwrap();
        let masks = table.column("ipAdEntNetMask").unwrap();
        assert_eq!(if_index["10.0.0.1"], DecodedValue::Integer(3));
        assert_eq!(masks["10.0.0.1"], DecodedValue::Text("255.255.255.0".to_string()));
        // dotted indices never turn into integer keys
        assert!(table.integer_by_index("ipAdEntIfIndex").is_empty());
    }

    #[test]
    fn test_hex_text_column_decoded() {
        let raw = ".1.3.6.1.2.1.2.2.1.2.7 = Hex-STRING: 50 6F 72 74 20 37 00";
        assert_eq!(decode(raw, &IF_TABLE).text_by_index("ifDescr")[&7], "Port 7");
    }

    #[test]
    fn test_hex_continuation_lines_joined() {
        let raw = concat!(
            ".1.3.6.1.2.1.2.2.1.2.1 = Hex-STRING: 47 69 67 61 62 69 74 45 74 68 65 72 6E 65 74 30 \n",
            "2F 31 \n",
            ".1.3.6.1.2.1.2.2.1.2.2 = STRING: \"Vlan1\"\n",
        );
        let descr = decode(raw, &IF_TABLE).text_by_index("ifDescr");
        assert_eq!(descr[&1], "GigabitEthernet0/1");
        assert_eq!(descr[&2], "Vlan1");
    }

    #[test]
    fn test_multiline_quoted_string() {
        let raw = concat!(
            ".1.3.6.1.2.1.31.1.1.1.18.4 = STRING: \"uplink\n",
            "to core\"\n",
            ".1.3.6.1.2.1.31.1.1.1.1.4 = STRING: \"Te1/1\"\n",
        );
        let table = decode(raw, &IF_X_TABLE);
        assert_eq!(table.text_by_index("ifAlias")[&4], "uplink\nto core");
        assert_eq!(table.text_by_index("ifName")[&4], "Te1/1");
    }

    #[test]
    fn test_first_duplicate_row_wins() {
        let raw = concat!(
            ".1.3.6.1.2.1.2.2.1.2.1 = STRING: \"first\"\n",
            ".1.3.6.1.2.1.2.2.1.2.1 = STRING: \"second\"\n",
        );
        assert_eq!(decode(raw, &IF_TABLE).text_by_index("ifDescr")[&1], "first");
    }

    #[test]
    fn test_parse_rows_exposes_raw_rows() {
        let decoder = TableDecoder::new(&IF_TABLE);
        let rows = decoder.parse_rows(".1.3.6.1.2.1.2.2.1.7.12 = INTEGER: up(1)");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column, 7);
        assert_eq!(rows[0].table_index(), Some(12));
        assert_eq!(rows[0].value_type, ValueType::Integer);
        assert_eq!(rows[0].raw_value, "up(1)");
    }

    #[test]
    fn test_decode_scalar() {
        let raw = ".1.3.6.1.2.1.1.1.0 = STRING: \"Cisco IOS Software, C2960X\"\n";
        let value = decode_scalar(raw, "1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(value.text(), "Cisco IOS Software, C2960X");

        let raw = ".1.3.6.1.2.1.1.7.0 = INTEGER: 78";
        assert_eq!(decode_scalar(raw, ".1.3.6.1.2.1.1.7.0").unwrap().integer(), Some(78));
    }

    #[test]
    fn test_decode_scalar_error_values() {
        let raw = ".1.3.6.1.2.1.17.1.1.0 = No Such Object available on this agent at this OID";
        assert!(decode_scalar(raw, "1.3.6.1.2.1.17.1.1.0").is_none());
        assert!(decode_scalar("", "1.3.6.1.2.1.1.1.0").is_none());
    }

    #[test]
    fn test_decode_scalar_hex_octet_string() {
        let raw = ".1.3.6.1.2.1.1.1.0 = STRING: 0x4a756e6f53";
        assert_eq!(decode_scalar(raw, "1.3.6.1.2.1.1.1.0").unwrap().text(), "JunoS");
    }

    #[test]
    fn test_subtree_values_respects_component_boundary() {
        let raw = "\
.1.3.6.1.2.1.47.1.1.1.1.13.1 = STRING: \"\"
.1.3.6.1.2.1.47.1.1.1.1.13.2 = STRING: \"WS-C2960X-48FPD-L\"
.1.3.6.1.2.1.47.1.1.1.1.130.1 = STRING: \"elsewhere\"
";
        let values = subtree_values(raw, ".1.3.6.1.2.1.47.1.1.1.1.13");
        let texts: Vec<String> = values.iter().map(ScalarValue::text).collect();
        assert_eq!(texts, vec!["".to_string(), "WS-C2960X-48FPD-L".to_string()]);
    }

    #[test]
    fn test_value_type_from_tag() {
        assert_eq!(ValueType::from_tag("STRING"), ValueType::String);
        assert_eq!(ValueType::from_tag("Hex-STRING"), ValueType::HexString);
        assert_eq!(ValueType::from_tag("INTEGER"), ValueType::Integer);
        assert_eq!(ValueType::from_tag("Counter64"), ValueType::Counter);
        assert_eq!(ValueType::from_tag("Timeticks"), ValueType::Counter);
        assert_eq!(ValueType::from_tag("IpAddress"), ValueType::String);
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_leading_integer("42"), 42);
        assert_eq!(parse_leading_integer("(8765) 0:01:27.65"), 8765);
        assert_eq!(parse_leading_integer("testing(3)"), 3);
        assert_eq!(parse_leading_integer("-1"), -1);
        assert_eq!(parse_leading_integer(""), 0);
        assert_eq!(parse_leading_integer("abc"), 0);
        assert_eq!(parse_leading_counter("-5"), 0);
    }
}
