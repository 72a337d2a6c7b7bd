//! Generic numbers carried in the PDB B-factor column.
//!
//! GPCRDB-indexed structure files replace each residue's temperature factor with its generic
//! number written as `helix.position` (`3.50` for `3x50`). A negative value marks the first
//! bulge insertion after that position (`-2.41` for `2x411`). Values outside the open interval
//! `(-8.1, 8.1)` are ordinary B-factors and carry no generic number.

use crate::model::generic::GenericNumber;

/// Exclusive magnitude bound for B-factors that encode a generic number.
pub const GENERIC_NUMBER_LIMIT: f64 = 8.1;

/// Decodes a B-factor into a generic number.
///
/// # Returns
///
/// `None` when the value lies outside the encoding range.
pub fn decode_generic_number(b_factor: f64) -> Option<GenericNumber> {
    if !(b_factor > -GENERIC_NUMBER_LIMIT && b_factor < GENERIC_NUMBER_LIMIT) {
        return None;
    }

    let scaled = (b_factor.abs() * 100.0).round() as u32;
    let helix = (scaled / 100) as u8;
    let position = (scaled % 100) as u8;

    if b_factor < 0.0 {
        GenericNumber::with_insertion(helix, position, 1)
    } else {
        GenericNumber::new(helix, position)
    }
}

/// Encodes a generic number as a B-factor value.
///
/// # Returns
///
/// `None` for insertions other than the first and for labels whose value would fall outside
/// the encoding range.
pub fn encode_generic_number(gn: &GenericNumber) -> Option<f64> {
    let magnitude = f64::from(gn.helix()) + f64::from(gn.position()) / 100.0;
    if magnitude >= GENERIC_NUMBER_LIMIT {
        return None;
    }

    match gn.insertion() {
        None => Some(magnitude),
        Some(1) => Some(-magnitude),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gn(label: &str) -> GenericNumber {
        label.parse().unwrap()
    }

    #[test]
    fn decode_reads_two_digit_positions() {
        assert_eq!(decode_generic_number(3.5), Some(gn("3x50")));
        assert_eq!(decode_generic_number(1.05), Some(gn("1x05")));
        assert_eq!(decode_generic_number(7.53), Some(gn("7x53")));
    }

    #[test]
    fn decode_reads_negative_values_as_bulges() {
        assert_eq!(decode_generic_number(-2.41), Some(gn("2x411")));
    }

    #[test]
    fn decode_rejects_values_outside_range() {
        assert_eq!(decode_generic_number(8.1), None);
        assert_eq!(decode_generic_number(-8.1), None);
        assert_eq!(decode_generic_number(35.2), None);
        assert_eq!(decode_generic_number(f64::NAN), None);
    }

    #[test]
    fn encode_decode_agree_over_transmembrane_labels() {
        for helix in 1..=7u8 {
            for position in [0u8, 1, 9, 10, 48, 50, 99] {
                let plain = GenericNumber::new(helix, position).unwrap();
                let bulge = GenericNumber::with_insertion(helix, position, 1).unwrap();

                let written = format!("{:.2}", encode_generic_number(&plain).unwrap());
                assert_eq!(decode_generic_number(written.parse().unwrap()), Some(plain));

                let written = format!("{:.2}", encode_generic_number(&bulge).unwrap());
                assert_eq!(decode_generic_number(written.parse().unwrap()), Some(bulge));
            }
        }
    }

    #[test]
    fn encode_rejects_unrepresentable_labels() {
        assert_eq!(encode_generic_number(&gn("2x552")), None);
        assert_eq!(encode_generic_number(&gn("12x48")), None);
    }
}
