use gsm_core::ir::{BasicBlock, BlockId, IROp, IrModule, IrType, Operand, Reg, Routine, SlotId, SlotInfo, Terminator};
use gsm_core::vm::{VmError, VmOptions, run_module};
use gsm_core::{LowerOptions, Script, compile_source};

fn run_with(src: &str, opts: &VmOptions) -> (Result<i32, VmError>, Vec<i32>) {
    let script = Script::from_source("vm.gsm", src);
    let compiled = compile_source(&script, &LowerOptions::default()).expect("compile");
    let mut written: Vec<i32> = Vec::new();
    let result = run_module(&compiled.module, &mut written, opts);
    (result, written)
}

fn run(src: &str) -> Vec<i32> {
    let (result, written) = run_with(src, &VmOptions::default());
    assert_eq!(result, Ok(0));
    written
}

#[test]
fn every_assignment_reaches_the_sink() {
    assert_eq!(run("int x = 2; x = x + 3;"), [5]);
    assert_eq!(run("int x = 10; x -= 3; x *= 2; x /= 4; x %= 2;"), [7, 14, 3, 1]);
}

#[test]
fn large_exponent_runs_to_completion() {
    assert_eq!(run("int x = 1; x = x ^ 1025;"), [1]);
    assert_eq!(run("int x = 0 - 1; x = x ^ 1025;"), [-1]);
}

#[test]
fn initializers_bind_to_the_trailing_names() {
    assert_eq!(run("int a, b, c = 1, 2; a = a; b = b; c = c;"), [0, 1, 2]);
    assert_eq!(run("int a, b = 1, 2; a = a; b = b;"), [1, 2]);
    assert_eq!(run("int a, b, c = 7; a = a; b = b; c = c;"), [0, 0, 7]);
}

#[test]
fn declarations_alone_write_nothing() {
    assert!(run("int a, b, c = 5;").is_empty());
}

#[test]
fn trailing_initializers_leave_leading_names_zero() {
    assert_eq!(run("int a, b, c = 5; a = a; b = b; c = c;"), [0, 0, 5]);
}

#[test]
fn loop_with_false_guard_never_runs() {
    assert!(run("int i = 5; loop i < 3: begin i = i + 1 end").is_empty());
}

#[test]
fn loop_guard_is_reevaluated_each_iteration() {
    assert_eq!(run("int i; loop i < 3: begin i = i + 1 end"), [1, 2, 3]);
    assert_eq!(
        run("int i, n = 3; loop i < n: begin i = i + 1 n = n - 1 end"),
        [1, 2, 2, 1]
    );
}

#[test]
fn exactly_one_branch_of_a_chain_runs() {
    let chain = |a: i32| {
        run(&format!(
            "int x, a = {}; if a == 1: begin x = 10 end elif a == 2: begin x = 20 end elif a > 0: begin x = 30 end else: begin x = 40 end",
            a
        ))
    };
    assert_eq!(chain(1), [10]);
    assert_eq!(chain(2), [20]);
    assert_eq!(chain(7), [30]);
    assert_eq!(chain(0), [40]);
}

#[test]
fn chain_without_else_may_run_nothing() {
    assert!(run("int x, a = 3; if a == 1: begin x = 1 end elif a == 2: begin x = 2 end").is_empty());
}

#[test]
fn power_multiplies_base_exponent_times() {
    assert_eq!(run("int y, x = 3; y = x ^ 0; y = x ^ 1; y = x ^ 4;"), [1, 3, 81]);
}

#[test]
fn comparisons_yield_zero_or_one() {
    assert_eq!(run("int a = 5; a = a > 3; a = a > 3;"), [1, 0]);
    assert_eq!(run("int a = 4; a = a != 4; a = a <= 0;"), [0, 1]);
}

#[test]
fn logical_operators_work_bitwise() {
    assert_eq!(run("int a, b = 6; a = b and 3; a = b or 1;"), [2, 7]);
}

#[test]
fn arithmetic_wraps_at_32_bits() {
    assert_eq!(run("int x = 2147483647; x = x + 1;"), [i32::MIN]);
}

#[test]
fn division_by_zero_stops_execution() {
    let (result, written) = run_with("int a, b = 1; b = b + 1; a = b / a;", &VmOptions::default());
    assert!(matches!(result, Err(VmError::DivisionByZero { .. })));
    assert_eq!(written, [2]);
}

#[test]
fn step_limit_bounds_endless_loops() {
    let opts = VmOptions { step_limit: Some(1_000), trace: false };
    let (result, written) = run_with("int i; loop 1: begin i = i + 1 end", &opts);
    assert_eq!(result, Err(VmError::StepLimitExceeded { limit: 1_000 }));
    assert!(!written.is_empty());
}

#[test]
fn reading_a_slot_before_any_store_is_an_error() {
    let slot = SlotId(0);
    let module = IrModule {
        name: "handmade".to_string(),
        externs: Vec::new(),
        routine: Routine {
            name: "main".to_string(),
            params: Vec::new(),
            ret: IrType::I32,
            slots: vec![SlotInfo { id: slot, name: "ghost".to_string() }],
            blocks: vec![BasicBlock {
                id: BlockId(0),
                name: "entry".to_string(),
                ops: vec![IROp::Alloca { slot }, IROp::Load { dest: Reg(0), slot }],
                terminator: Some(Terminator::Ret { value: Operand::Reg(Reg(0)) }),
            }],
        },
    };
    let mut written: Vec<i32> = Vec::new();
    assert_eq!(
        run_module(&module, &mut written, &VmOptions::default()),
        Err(VmError::UninitialisedSlot { slot: "ghost".to_string() })
    );
}

#[test]
fn calls_to_undeclared_routines_fail() {
    let module = IrModule {
        name: "handmade".to_string(),
        externs: Vec::new(),
        routine: Routine {
            name: "main".to_string(),
            params: Vec::new(),
            ret: IrType::I32,
            slots: Vec::new(),
            blocks: vec![BasicBlock {
                id: BlockId(0),
                name: "entry".to_string(),
                ops: vec![IROp::Call { callee: "nowhere".to_string(), args: vec![Operand::Imm(1)] }],
                terminator: Some(Terminator::Ret { value: Operand::Imm(0) }),
            }],
        },
    };
    let mut written: Vec<i32> = Vec::new();
    assert!(matches!(
        run_module(&module, &mut written, &VmOptions::default()),
        Err(VmError::UnknownCallee { .. })
    ));
}
