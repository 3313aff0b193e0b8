//! Property tests for the number and symbol codecs

use lava_vm_core::{Ident, IdentVariant, Num48};
use proptest::prelude::*;

fn any_num48() -> impl Strategy<Value = Num48> {
    (0..Num48::FULL).prop_map(Num48::from_raw)
}

proptest! {
    #[test]
    fn prop_int_round_trip(i in Num48::MIN_INT..=Num48::MAX_INT) {
        prop_assert_eq!(Num48::from_int(i).to_int(), i);
    }

    #[test]
    fn prop_int_has_no_fraction(i in Num48::MIN_INT..=Num48::MAX_INT) {
        let (_, _, fraction) = Num48::from_int(i).to_chars();
        prop_assert_eq!(fraction, 0);
    }

    #[test]
    fn prop_add_then_sub(a in any_num48(), b in any_num48()) {
        prop_assert_eq!((a + b) - b, a);
    }

    #[test]
    fn prop_results_stay_in_ring(a in any_num48(), b in any_num48()) {
        prop_assert!((a + b).raw() < Num48::FULL);
        prop_assert!((a - b).raw() < Num48::FULL);
        prop_assert!((a * b).raw() < Num48::FULL);
        prop_assert!((-a).raw() < Num48::FULL);
    }

    #[test]
    fn prop_double_negation(a in any_num48()) {
        prop_assert_eq!(-(-a), a);
    }

    #[test]
    fn prop_chars_round_trip(c0 in 0u16..64_000, c1 in 0u16..64_000, c2 in 0u16..64_000) {
        prop_assert_eq!(Num48::from_chars(c0, c1, c2).to_chars(), (c0, c1, c2));
    }

    #[test]
    fn prop_int_mul(a in -40_000i32..40_000, b in -40_000i32..40_000) {
        prop_assert_eq!((Num48::from_int(a) * Num48::from_int(b)).to_int(), a * b);
    }

    #[test]
    fn prop_idiv_truncates(a in -1_000_000i32..1_000_000, b in 1i32..1_000) {
        prop_assert_eq!(Num48::from_int(a).idiv(Num48::from_int(b)).to_int(), a / b);
    }

    #[test]
    fn prop_fdiv_precision(a in -1_000_000i32..1_000_000, b in 1i32..1_000) {
        let q = Num48::from_int(a).fdiv(Num48::from_int(b)).to_float();
        let expected = a as f64 / b as f64;
        prop_assert!((f64::from(q) - expected).abs() <= 1.0 / 64_000.0 + expected.abs() * 1e-6);
    }

    #[test]
    fn prop_ident_deterministic(name in "[A-Za-z0-9_]{1,12}") {
        prop_assert_eq!(Ident::from_name(&name), Ident::from_name(&name));
    }

    #[test]
    fn prop_ident_case_insensitive(name in "[a-z]{1,8}") {
        prop_assert_eq!(Ident::from_name(&name), Ident::from_name(&name.to_uppercase()));
    }

    #[test]
    fn prop_representative_encodes_back(code in 0x1000u16..=Ident::MAX) {
        // codes with a non-zero leading digit decode to four meaningful characters
        let ident = Ident(code);
        let name = ident.to_name(IdentVariant::Primary);
        prop_assert_eq!(Ident::from_name(&name), ident);
        let alt = ident.to_name(IdentVariant::Alternate);
        prop_assert_eq!(Ident::from_name(&alt), ident);
    }
}

#[test]
fn mul_and_fdiv_signs() {
    assert_eq!((Num48::from_int(-6) * Num48::from_int(7)).to_int(), -42);
    let q = Num48::from_int(-7).fdiv(Num48::from_int(2));
    assert!((q.to_float() + 3.5).abs() <= 1.0 / 64_000.0);
}

#[test]
fn distinct_names_share_a_code() {
    let a = "GOLD";
    let b = "JOLT";
    assert_ne!(a, b);
    assert_eq!(Ident::from_name(a), Ident::from_name(b));
    // digits alias letters too, which is what keeps the 9000+ keys apart from
    // ordinary names only by convention
    assert_eq!(Ident::from_name("9001"), Ident::from_name("U__J"));
}
