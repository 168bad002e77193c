//! Row codec
//!
//! A ledger row is ten positional cells:
//! `id, name, imageUrl, hp, attack, rarity, attribute, productName, manufacturer, createdAt`.
//! Decoding never rejects a row: absent or unreadable numeric cells become 0,
//! absent text cells become "".

use serde_json::Value;

use crate::monster::{Monster, MonsterRecord, Provenance};

pub const COLUMN_COUNT: usize = 10;

/// Header row expected in the first line of the sheet
pub const HEADER: [&str; COLUMN_COUNT] = [
    "id",
    "name",
    "imageUrl",
    "hp",
    "attack",
    "rarity",
    "attribute",
    "productName",
    "manufacturer",
    "createdAt",
];

const ID: usize = 0;
const NAME: usize = 1;
const IMAGE_URL: usize = 2;
const HP: usize = 3;
const ATTACK: usize = 4;
const RARITY: usize = 5;
const ATTRIBUTE: usize = 6;
const PRODUCT_NAME: usize = 7;
const MANUFACTURER: usize = 8;
const CREATED_AT: usize = 9;

pub fn record_to_row(record: &MonsterRecord) -> Vec<Value> {
    let monster = &record.monster;
    let provenance = &record.provenance;
    vec![
        Value::from(monster.id.as_str()),
        Value::from(monster.name.as_str()),
        Value::from(monster.image_url.as_str()),
        Value::from(monster.hp),
        Value::from(monster.attack),
        Value::from(monster.rarity),
        Value::from(monster.attribute.as_str()),
        Value::from(provenance.product_name.as_str()),
        Value::from(provenance.manufacturer.as_str()),
        Value::from(provenance.created_at.as_str()),
    ]
}

pub fn record_from_row(row: &[Value]) -> MonsterRecord {
    MonsterRecord {
        monster: Monster {
            id: text_cell(row, ID),
            name: text_cell(row, NAME),
            image_url: text_cell(row, IMAGE_URL),
            hp: number_cell(row, HP),
            attack: number_cell(row, ATTACK),
            rarity: u8::try_from(number_cell(row, RARITY)).unwrap_or(0),
            attribute: text_cell(row, ATTRIBUTE),
        },
        provenance: Provenance {
            product_name: text_cell(row, PRODUCT_NAME),
            manufacturer: text_cell(row, MANUFACTURER),
            created_at: text_cell(row, CREATED_AT),
        },
    }
}

/// Decode a full sheet read: drop the header row, decode the rest, newest first
pub fn records_from_rows(rows: Vec<Vec<Value>>) -> Vec<MonsterRecord> {
    let mut records: Vec<MonsterRecord> = rows
        .iter()
        .skip(1)
        .map(|row| record_from_row(row))
        .collect();
    records.reverse();
    records
}

fn text_cell(row: &[Value], index: usize) -> String {
    match row.get(index) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Non-negative integer cell. Fractions truncate; negatives, text, and blanks read as 0.
fn number_cell(row: &[Value], index: usize) -> u32 {
    let value = match row.get(index) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(n) if n.is_finite() && n >= 0.0 => n.trunc() as u32,
        _ => 0,
    }
}
