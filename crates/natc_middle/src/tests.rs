use std::collections::HashMap;

use insta::assert_snapshot;
use natc_interner::Interner;
use natc_ir::{FatalError, FatalErrorKind, Nat, Node, Op, PReg, Program, Reg, VReg};

use crate::{allocate, analyze, Cell, Interpreter, Lowerer};

const CORPUS: &[&str] = &[
    "a = 2 + 3;",
    "a = 1 << 3;",
    "a = (1 == 1);",
    "x = 1; y = 2; a = x << y;",
    "a = 5; b = a; c = b + a;",
    "a = 1; b = 2; c = 3; d = a * b + c * (a - b);",
    "a = ~1 ^ -2; b = a >> 4 | a << 60; c = b % 7 / 2;",
    "a = 1 < 2; b = 2 <= 2; c = 3 > 4; d = 4 >= 4; e = a != b & c == d;",
    "a = 0x10; a = a + a; a = a * a;",
];

fn parse(source: &str, interner: &mut Interner) -> Program {
    let (tokens, lexer_errors) = natc_frontend::lex(source, interner);
    assert!(lexer_errors.is_empty());

    let output = natc_frontend::parse(tokens, source, interner);
    assert!(output.errors.is_empty());
    assert!(output.unbound.is_empty());

    output.program
}

fn lower(source: &str) -> (Program, usize, Interner) {
    let mut interner = Interner::new();
    let program = parse(source, &mut interner);

    let mut lowerer = Lowerer::new();
    let program = lowerer.lower_program(program, &interner).unwrap();

    (program, lowerer.vreg_count(), interner)
}

fn dump(program: &Program, interner: &Interner) -> String {
    program
        .iter()
        .map(|node| node.display(interner).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The physical register each virtual register was given.
fn assignments(ssa: &Program, allocated: &Program) -> HashMap<VReg, PReg> {
    ssa.tuples()
        .zip(allocated.tuples())
        .map(|((_, before), (_, after))| {
            (
                before.dest.as_ssa().unwrap(),
                after.dest.as_phy().unwrap(),
            )
        })
        .collect()
}

#[test]
fn lower_constant_sum() {
    let (program, vreg_count, interner) = lower("a = 2 + 3;");

    assert_eq!(vreg_count, 3);
    assert_snapshot!(dump(&program, &interner), @r###"
    (setvar 'a', (add (li 0x2), (li 0x3)))
    (setreg _0, (li 0x2))
    (setreg _1, (li 0x3))
    (setreg _2, (add _0, _1))
    "###);
}

#[test]
fn shift_by_constant_uses_immediate() {
    let (program, vreg_count, interner) = lower("a = 1 << 3; b = a >> 2;");

    // no register for either shift amount
    assert_eq!(vreg_count, 3);
    assert_snapshot!(dump(&program, &interner), @r###"
    (setvar 'a', (sll (li 0x1), (li 0x3)))
    (setreg _0, (li 0x1))
    (setreg _1, (slli _0, 0x3))
    (setvar 'b', (srl (var 'a'), (li 0x2)))
    (setreg _2, (srli _1, 0x2))
    "###);
}

#[test]
fn shift_by_variable_uses_register() {
    let (program, vreg_count, interner) = lower("x = 1; y = 2; a = x << y;");

    assert_eq!(vreg_count, 3);
    assert_snapshot!(dump(&program, &interner), @r###"
    (setvar 'x', (li 0x1))
    (setreg _0, (li 0x1))
    (setvar 'y', (li 0x2))
    (setreg _1, (li 0x2))
    (setvar 'a', (sll (var 'x'), (var 'y')))
    (setreg _2, (sll _0, _1))
    "###);
}

#[test]
fn bare_variable_assignment_copies() {
    let (program, _, interner) = lower("a = 5; b = a;");

    let (_, copy) = program.tuples().last().unwrap();
    assert_eq!(copy.origin, interner.lookup("b"));
    assert_eq!(copy.value.op(), Some(Op::Addi));
    assert_snapshot!(
        Node::SetReg(copy.clone()).display(&interner),
        @"(setreg _1, (addi _0, 0x0))"
    );
}

#[test]
fn assignments_tag_their_last_tuple() {
    let (program, _, interner) = lower("a = 1 + 2; b = a * 3;");

    let tagged: Vec<_> = program
        .tuples()
        .filter_map(|(_, tuple)| tuple.origin.map(|name| (&interner[name], tuple.dest)))
        .collect();

    assert_eq!(
        tagged,
        [("a", Reg::Ssa(VReg(2))), ("b", Reg::Ssa(VReg(4)))]
    );
}

#[test]
fn lowering_state_persists() {
    let mut interner = Interner::new();
    let mut lowerer = Lowerer::new();

    let first = parse("a = 1;", &mut interner);
    lowerer.lower_program(first, &interner).unwrap();

    // `a` is not defined as far as this parse is concerned, so build by hand
    let a = interner.intern("a");
    let b = interner.intern("b");
    let mut second = Program::new();
    second.push(Node::SetVar {
        name: b,
        value: Box::new(Node::binary(Op::Add, Node::Var(a), Node::Var(a))),
    });

    let second = lowerer.lower_program(second, &interner).unwrap();
    assert_snapshot!(dump(&second, &interner), @r###"
    (setvar 'b', (add (var 'a'), (var 'a')))
    (setreg _1, (add _0, _0))
    "###);
}

#[test]
fn unbound_register() {
    let mut interner = Interner::new();
    let a = interner.intern("a");

    let mut program = Program::new();
    program.push(Node::SetVar {
        name: a,
        value: Box::new(Node::Var(a)),
    });

    let err = Lowerer::new().lower_program(program, &interner).unwrap_err();
    assert_eq!(err, FatalError::UnboundRegister("a".to_owned()));
    assert_eq!(err.kind(), FatalErrorKind::Internal);
}

#[test]
fn non_register_expression() {
    let mut interner = Interner::new();
    let a = interner.intern("a");

    let mut program = Program::new();
    program.push(Node::SetVar {
        name: a,
        value: Box::new(Node::Imm(1)),
    });

    let err = Lowerer::new().lower_program(program, &interner).unwrap_err();
    assert_eq!(err.to_string(), "expected register-producing node, found imm");
}

#[test]
fn single_assignment() {
    for source in CORPUS {
        let (program, vreg_count, _) = lower(source);

        let mut defined = vec![false; vreg_count];
        for (_, tuple) in program.tuples() {
            for reg in tuple.operands() {
                let vreg = reg.as_ssa().unwrap();
                assert!(defined[vreg.0], "{source}: {vreg} used before def");
            }

            let dest = tuple.dest.as_ssa().unwrap();
            assert!(!defined[dest.0], "{source}: {dest} defined twice");
            defined[dest.0] = true;
        }

        assert!(defined.iter().all(|&d| d), "{source}: unused register number");
    }
}

#[test]
fn chart_rows() {
    let (program, vreg_count, _) = lower("a = 2 + 3;");
    let chart = analyze(&program, vreg_count);

    let rows: Vec<_> = (0..chart.rows()).map(|row| chart.render_row(row)).collect();
    assert_eq!(rows, ["   ", "v  ", "|v ", "++v"]);
}

#[test]
fn chart_spans_high_level_rows() {
    let (program, vreg_count, _) = lower("a = 1; b = 2; c = a + b;");
    let chart = analyze(&program, vreg_count);

    // _0 stays live across the `setvar` rows between its def and its use
    let column: String = chart.column(VReg(0)).map(Cell::glyph).collect();
    assert_eq!(column, " v|||+");
}

#[test]
fn liveness_is_contiguous() {
    for source in CORPUS {
        let (program, vreg_count, _) = lower(source);
        let chart = analyze(&program, vreg_count);

        for vreg in (0..vreg_count).map(VReg) {
            let cells: Vec<_> = chart.column(vreg).collect();
            let first = cells.iter().position(|cell| !cell.is_blank()).unwrap();
            let last = cells.iter().rposition(|cell| !cell.is_blank()).unwrap();

            assert_eq!(cells[first], Cell::Def, "{source}: {vreg}");
            assert!(
                cells[first..=last].iter().all(|cell| !cell.is_blank()),
                "{source}: {vreg} has a gap"
            );
            assert!(
                matches!(cells[last], Cell::Def | Cell::Use),
                "{source}: {vreg} ends live"
            );
        }
    }
}

#[test]
fn allocate_simple() {
    let (mut program, vreg_count, interner) = lower("a = 2 + 3;");
    let chart = analyze(&program, vreg_count);

    let order = [PReg(10), PReg(11), PReg(12)];
    let phy = allocate(&mut program, &chart, 13, &order).unwrap();

    assert_snapshot!(dump(&program, &interner), @r###"
    (setvar 'a', (add (li 0x2), (li 0x3)))
    (setreg x10, (li 0x2))
    (setreg x11, (li 0x3))
    (setreg x12, (add x10, x11))
    "###);

    assert_eq!(phy.width(), 13);
    assert_eq!(phy.get(1, PReg(10)), Cell::Def);
    assert_eq!(phy.get(2, PReg(10)), Cell::Live);
    assert_eq!(phy.get(2, PReg(11)), Cell::Def);
    assert_eq!(phy.get(3, PReg(10)), Cell::Use);
    assert_eq!(phy.get(3, PReg(11)), Cell::Use);
    assert_eq!(phy.get(3, PReg(12)), Cell::Def);
    assert!(phy.row(0).iter().all(|cell| cell.is_blank()));
}

#[test]
fn released_register_is_reused_first() {
    let (mut program, vreg_count, interner) = lower("a = 1; b = 2; c = 3;");
    let chart = analyze(&program, vreg_count);

    let order = [PReg(10), PReg(11), PReg(12)];
    allocate(&mut program, &chart, 13, &order).unwrap();

    let dests: Vec<_> = program.tuples().map(|(_, tuple)| tuple.dest).collect();
    assert_eq!(dests, [Reg::Phy(PReg(10)); 3], "{}", dump(&program, &interner));
}

#[test]
fn allocation_never_shares_a_register() {
    let order: Vec<_> = (1..32).map(PReg).collect();

    for source in CORPUS {
        let (ssa, vreg_count, _) = lower(source);
        let chart = analyze(&ssa, vreg_count);

        let mut allocated = ssa.clone();
        allocate(&mut allocated, &chart, 32, &order).unwrap();
        let assigned = assignments(&ssa, &allocated);

        for row in 0..chart.rows() {
            let mut held: Vec<_> = (0..vreg_count)
                .map(VReg)
                .filter(|&vreg| !chart.get(row, vreg).is_blank())
                .map(|vreg| assigned[&vreg])
                .collect();

            let live = held.len();
            held.sort();
            held.dedup();
            assert_eq!(held.len(), live, "{source}: row {row}");
        }

        for (_, tuple) in allocated.tuples() {
            assert!(tuple.operands().all(|reg| reg.as_phy().is_some()));
        }
    }
}

#[test]
fn spill_is_fatal() {
    let (mut program, vreg_count, _) = lower("a = 1 + (2 + 3);");
    let chart = analyze(&program, vreg_count);

    let err = allocate(&mut program, &chart, 4, &[PReg(1), PReg(2)]).unwrap_err();
    assert_eq!(err, FatalError::RegisterSpill);
    assert_eq!(err.kind(), FatalErrorKind::Exhausted);
    assert_eq!(err.to_string(), "register spilling not implemented");
}

#[test]
fn interpret() {
    let mut interner = Interner::new();
    let program = parse(
        "a = 2 + 3; b = a * a - 1; c = ~0; d = 2 - 3; e = 2 ** 70; a = a + 1; f = 7 / 0;",
        &mut interner,
    );

    let results = Interpreter::new().run(&program, &interner).unwrap();
    let lines: Vec<_> = results
        .iter()
        .map(|(name, value)| {
            format!(
                "{} = {} ({})",
                &interner[*name],
                value,
                value.to_string_radix(16)
            )
        })
        .collect();

    assert_snapshot!(lines.join("\n"), @r###"
    a = 5 (0x5)
    b = 24 (0x18)
    c = 18446744073709551615 (0xffffffffffffffff)
    d = 18446744073709551615 (0xffffffffffffffff)
    e = 1180591620717411303424 (0x400000000000000000)
    a = 6 (0x6)
    f = 18446744073709551615 (0xffffffffffffffff)
    "###);
}

#[test]
fn interpret_rejects_oversized_values() {
    let cases = [
        ("a = 1 << 0xffffffffffffffff;", Op::Sll),
        ("a = 3 ** 0xffffffff;", Op::Pow),
        ("a = 1 << 40000; b = a * a;", Op::Mul),
    ];

    for (source, op) in cases {
        let mut interner = Interner::new();
        let program = parse(source, &mut interner);

        let err = Interpreter::new().run(&program, &interner).unwrap_err();
        assert_eq!(err, FatalError::ValueTooWide { op }, "{source}");
        assert_eq!(err.kind(), FatalErrorKind::Exhausted);
    }

    // shrinking and fixed-point operations stay total
    let mut interner = Interner::new();
    let program = parse("a = 1 >> 0xffffffffffffffff; b = 1 ** 0xffffffff;", &mut interner);
    let values: Vec<_> = Interpreter::new()
        .run(&program, &interner)
        .unwrap()
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    assert_eq!(values, [Nat::zero(), Nat::from(1)]);
}

#[test]
fn huge_shift_amounts_saturate() {
    let (program, vreg_count, interner) = lower("a = 1 >> 0x1_0000_0000_0000_0000;");

    assert_eq!(vreg_count, 2);
    assert_snapshot!(dump(&program, &interner), @r###"
    (setvar 'a', (srl (li 0x1), (li 0x10000000000000000)))
    (setreg _0, (li 0x1))
    (setreg _1, (srli _0, 0x7fffffffffffffff))
    "###);
}
