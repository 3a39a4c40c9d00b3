//! Pin-level scenarios
//!
//! Everything here goes through the `Driver`, exactly as an external
//! controller would: clock, reset, bit-banged SPI and the RUN/STATE handshake.

use nibbler_core::{CoreError, Driver, EngineState, Inputs, Mode, OutCtrl};
use nibbler_spec::{Address, Config, MemoryResetPolicy, Nibble, Opcode, SpiFrame};

fn fresh() -> Driver {
    let mut driver = Driver::new(Config::default());
    driver.reset();
    driver
}

// ============================================================================
// Single stepping
// ============================================================================

#[test]
fn test_stop_at_zero_steps_once() {
    let mut driver = fresh();
    driver.write(Address::code(0), Opcode::Stop.to_cell());
    driver.enter_execution();
    driver.select(OutCtrl::FETCH);

    let mut inputs = driver.inputs();
    inputs.run = true;
    let next = nibbler_core::step(driver.core(), &inputs);
    *driver.core_mut() = next;

    let out = driver.core().outputs(&inputs);
    assert_eq!(out.state, EngineState::Running.code());
    assert_eq!(out.wide, 0x00);
    assert_eq!(out.narrow, 0x7);

    inputs.run = false;
    let next = nibbler_core::step(driver.core(), &inputs);
    *driver.core_mut() = next;

    let out = driver.core().outputs(&inputs);
    assert_eq!(out.state, EngineState::Idle.code());
    assert_eq!(out.wide, 0x01);
}

#[test]
fn test_nop_after_stop_steps_from_one() {
    let mut driver = fresh();
    driver.write(Address::code(0), Opcode::Stop.to_cell());
    driver.write(Address::code(1), Opcode::Nop.to_cell());
    driver.enter_execution();

    let first = driver.step().unwrap();
    assert_eq!(first.opcode, Opcode::Stop);
    assert_eq!(first.next_ip, 0x01);

    let second = driver.step().unwrap();
    assert_eq!(second.ip, 0x01);
    assert_eq!(second.opcode, Opcode::Nop);
    assert_eq!(second.next_ip, 0x02);
}

#[test]
fn test_holding_run_keeps_step_open() {
    let mut driver = fresh();
    driver.write(Address::code(0), Opcode::Stop.to_cell());
    driver.enter_execution();
    driver.select(OutCtrl::FETCH);

    let mut inputs = driver.inputs();
    inputs.run = true;
    for _ in 0..50 {
        driver.core_mut().tick(&inputs);
    }
    let out = driver.core().outputs(&inputs);
    assert_eq!(out.state, EngineState::Running.code());
    assert_eq!(out.wide, 0x00);
    assert_eq!(out.narrow, 0x7);
}

#[test]
fn test_reserved_opcodes_step_like_nop() {
    let mut driver = fresh();
    for (i, bits) in (1..=6).enumerate() {
        driver.write(Address::code(i as u8), Nibble::truncate(bits));
    }
    driver.write(Address::code(6), Opcode::Stop.to_cell());
    driver.enter_execution();

    let steps = driver.run_until_stop(16).unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[2].opcode, Opcode::Reserved(3));
    assert_eq!(steps.last().unwrap().next_ip, 7);
}

#[test]
fn test_opcode_ignores_bit_3() {
    let mut driver = fresh();
    driver.write(Address::code(0), Nibble::truncate(0xF));
    driver.enter_execution();
    assert_eq!(driver.step().unwrap().opcode, Opcode::Stop);
}

#[test]
fn test_data_read_port_through_mux() {
    let mut driver = fresh();
    driver.write(Address::data(0), Nibble::truncate(0x5));
    driver.enter_execution();
    driver.select(OutCtrl::new(7));
    let out = driver.outputs();
    assert_eq!(out.wide, 0x00);
    assert_eq!(out.narrow, 0x5);
}

// ============================================================================
// Programming interface
// ============================================================================

#[test]
fn test_frame_released_at_bit_8_is_dropped() {
    let mut driver = fresh();
    let target = Address::code(0x20);
    driver.write(target, Nibble::truncate(0x3));
    driver.abort_frame(target, Nibble::truncate(0xC), 8);
    assert_eq!(driver.read(target).unwrap().value(), 0x3);
}

#[test]
fn test_spi_ports_show_last_frame() {
    let mut driver = fresh();
    driver.write(Address::code(0x12), Nibble::truncate(0x6));
    driver.write(Address::data(0x34), Nibble::truncate(0x5));

    driver.select(OutCtrl::new(0));
    assert_eq!((driver.outputs().wide, driver.outputs().narrow), (0x12, 0x6));
    driver.select(OutCtrl::new(1));
    assert_eq!((driver.outputs().wide, driver.outputs().narrow), (0x12, 0x6));
    driver.select(OutCtrl::new(2));
    assert_eq!((driver.outputs().wide, driver.outputs().narrow), (0x34, 0x5));
    driver.select(OutCtrl::new(3));
    assert_eq!((driver.outputs().wide, driver.outputs().narrow), (0x34, 0x5));
}

#[test]
fn test_spi_in_execution_mode_is_ignored() {
    let mut driver = fresh();
    driver.write(Address::code(4), Nibble::truncate(0x1));
    driver.enter_execution();
    driver.write(Address::code(4), Nibble::truncate(0x2));
    driver.enter_programming();
    assert_eq!(driver.read(Address::code(4)).unwrap().value(), 0x1);
}

/// Clock one frame by hand, flipping MODE to `second` after bit 8
fn frame_across_mode_change(driver: &mut Driver, frame: SpiFrame, first: Mode, second: Mode) {
    let word = frame.encode();
    let mut inputs = Inputs {
        mode: first,
        spi_cs_n: false,
        ..Inputs::default()
    };
    driver.core_mut().tick(&inputs);
    for i in (0..16).rev() {
        if i == 7 {
            inputs.mode = second;
        }
        inputs.spi_mosi = (word >> i) & 1 == 1;
        inputs.spi_sck = false;
        driver.core_mut().tick(&inputs);
        inputs.spi_sck = true;
        driver.core_mut().tick(&inputs);
    }
    inputs.spi_cs_n = true;
    inputs.spi_mosi = true;
    driver.core_mut().tick(&inputs);
}

#[test]
fn test_frame_started_in_execution_never_commits() {
    let mut driver = fresh();
    let frame = SpiFrame::write(Address::code(5), Opcode::Stop.to_cell());
    frame_across_mode_change(&mut driver, frame, Mode::Execution, Mode::Programming);
    assert_eq!(driver.core().mode(), Mode::Programming);
    assert_eq!(driver.read(Address::code(5)).unwrap(), Nibble::ZERO);
}

#[test]
fn test_frame_finished_in_execution_never_commits() {
    let mut driver = fresh();
    let frame = SpiFrame::write(Address::data(5), Nibble::MAX);
    frame_across_mode_change(&mut driver, frame, Mode::Programming, Mode::Execution);
    driver.enter_programming();
    assert_eq!(driver.read(Address::data(5)).unwrap(), Nibble::ZERO);
}

#[test]
fn test_read_in_execution_mode_gets_no_answer() {
    let mut driver = fresh();
    driver.write(Address::data(1), Nibble::truncate(0x9));
    driver.enter_execution();
    // No response is loaded, so MISO stays low and the echoed address is wrong
    let err = driver.read(Address::data(1)).unwrap_err();
    assert!(matches!(err, CoreError::ReadbackAddress { .. }));
}

// ============================================================================
// Modes and reset
// ============================================================================

#[test]
fn test_run_in_programming_mode_is_inert() {
    let mut driver = fresh();
    driver.write(Address::code(0), Opcode::Stop.to_cell());
    let err = driver.step().unwrap_err();
    assert!(matches!(err, CoreError::Timeout { .. }));
    assert_eq!(driver.core().engine().ip(), 0);
    assert_eq!(driver.core().memory().read(Address::code(0)), Opcode::Stop.to_cell());
}

#[test]
fn test_back_to_programming_restarts_at_zero() {
    let mut driver = fresh();
    driver.enter_execution();
    driver.step().unwrap();
    driver.step().unwrap();
    assert_eq!(driver.core().engine().ip(), 2);

    driver.enter_programming();
    driver.enter_execution();
    assert_eq!(driver.step().unwrap().ip, 0);
}

#[test]
fn test_mode_switch_mid_step() {
    let mut driver = fresh();
    driver.write(Address::code(0), Opcode::Stop.to_cell());
    driver.enter_execution();

    let mut inputs = driver.inputs();
    inputs.run = true;
    driver.core_mut().tick(&inputs);
    assert!(driver.core().engine().is_running());

    driver.enter_programming();
    assert_eq!(driver.core().engine().state(), EngineState::Idle);
    assert_eq!(driver.core().memory().read(Address::code(0)), Opcode::Stop.to_cell());
}

#[test]
fn test_reset_clears_memory() {
    let mut driver = fresh();
    driver.write(Address::data(0x80), Nibble::MAX);
    driver.reset();
    assert_eq!(driver.read(Address::data(0x80)).unwrap(), Nibble::ZERO);
    assert_eq!(driver.core().mode(), Mode::Programming);
}

#[test]
fn test_reset_retains_memory_when_configured() {
    let mut driver = Driver::new(Config::default().with_memory_reset(MemoryResetPolicy::Retain));
    driver.reset();
    driver.write(Address::data(0x80), Nibble::MAX);
    driver.enter_execution();
    driver.step().unwrap();

    driver.reset();
    assert_eq!(driver.core().engine().ip(), 0);
    assert_eq!(driver.read(Address::data(0x80)).unwrap(), Nibble::MAX);
}

// ============================================================================
// Assembled programs
// ============================================================================

#[test]
fn test_assembled_program_runs_to_stop() {
    let image = nibbler_assembler::assemble(
        r#"
        nop
        nop
        op 3
        stop
        .data
        .nibble 1, 2, 3
    "#,
    )
    .unwrap();

    let mut driver = fresh();
    driver.load(&image);
    driver.verify(&image).unwrap();
    driver.enter_execution();

    let steps = driver.run_until_stop(32).unwrap();
    let opcodes: Vec<Opcode> = steps.iter().map(|s| s.opcode).collect();
    assert_eq!(
        opcodes,
        vec![Opcode::Nop, Opcode::Nop, Opcode::Reserved(3), Opcode::Stop]
    );
}
