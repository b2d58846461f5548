use bvopt::config::MoveFamilies;
use bvopt::model::{Signature, Sort};
use bvopt::optimizer::moves::{self, MoveCatalog, MoveKind, MoveGenerator};
use num_bigint::BigUint;
use rstest::rstest;

#[rstest]
#[case(moves::mk_inc_or_dec, 5, MoveKind::Inc, 6)] // odd -> inc
#[case(moves::mk_inc_or_dec, 4, MoveKind::Dec, 3)] // even -> dec
#[case(moves::mk_inc_or_dec, 0, MoveKind::Dec, 255)] // wraps
#[case(moves::mk_inc_or_dec, 255, MoveKind::Inc, 0)] // wraps
#[case(moves::mk_inv, 5, MoveKind::Inv, 250)]
#[case(moves::mk_unary_minus, 5, MoveKind::UnaryMinus, 251)]
#[case(moves::mk_unary_minus, 0, MoveKind::UnaryMinus, 0)]
#[case(moves::mk_mul2, 200, MoveKind::Mul2, 144)]
#[case(moves::mk_mul3, 100, MoveKind::Mul3, 44)]
#[case(moves::mk_div2, 7, MoveKind::Div2, 3)]
fn test_word_moves_on_a_byte(
    #[case] generator: MoveGenerator,
    #[case] value: u32,
    #[case] kind: MoveKind,
    #[case] expected: u32,
) {
    let (k, v) = generator(8, &BigUint::from(value));
    assert_eq!(k, kind);
    assert_eq!(v, BigUint::from(expected));
}

#[rstest]
#[case(MoveFamilies::default(), 6)]
#[case(MoveFamilies::minimal(), 1)]
#[case(MoveFamilies { enable_mul3: false, ..MoveFamilies::default() }, 5)]
#[case(MoveFamilies { enable_mul2_div2: false, ..MoveFamilies::default() }, 3)]
fn test_catalog_size(#[case] families: MoveFamilies, #[case] expected: usize) {
    assert_eq!(MoveCatalog::new(families).len(), expected);
}

#[test]
fn test_candidate_order_is_flips_then_word_moves() {
    let mut sig = Signature::new();
    let x = sig.declare("x", Sort::BitVec(4)).unwrap();
    let catalog = MoveCatalog::default();

    let kinds: Vec<MoveKind> = catalog
        .candidates(x, &BigUint::from(6u32))
        .iter()
        .map(|m| m.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            MoveKind::Flip,
            MoveKind::Flip,
            MoveKind::Flip,
            MoveKind::Flip,
            MoveKind::Dec,
            MoveKind::Inv,
            MoveKind::UnaryMinus,
            MoveKind::Mul2,
            MoveKind::Mul3,
            MoveKind::Div2,
        ]
    );
}

#[rstest]
#[case(Sort::Bool)]
#[case(Sort::BitVec(1))]
fn test_single_bit_variables_only_flip(#[case] sort: Sort) {
    let mut sig = Signature::new();
    let b = sig.declare("b", sort).unwrap();
    let candidates = MoveCatalog::default().candidates(b, &BigUint::from(0u32));

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kind, MoveKind::Flip);
    assert_eq!(candidates[0].value, BigUint::from(1u32));
}
