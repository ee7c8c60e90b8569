use crate::cpu::{Cpu, ExecutionError, HALT_OPCODE};
use gbe_proc_macros::EnumDisplay;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum StopReason {
    #[display = "reached HALT"]
    Halt,
    #[display = "step limit reached"]
    StepLimit,
}

/// Step the CPU until it reaches HALT (if `stop_on_halt`), runs out of steps, or fails. Returns
/// the number of instructions executed and why the loop stopped.
pub fn run(
    cpu: &mut Cpu,
    max_steps: Option<u64>,
    stop_on_halt: bool,
    debug_timing: bool,
) -> Result<(u64, StopReason), ExecutionError> {
    let start_time = Instant::now();

    let mut steps = 0_u64;
    let stop_reason = loop {
        if stop_on_halt && cpu.peek_opcode()? == HALT_OPCODE {
            log::info!("Reached HALT at PC={:04X}", cpu.registers().pc);
            break StopReason::Halt;
        }

        if max_steps.is_some_and(|max_steps| steps >= max_steps) {
            log::warn!("Step limit of {steps} reached at PC={:04X}", cpu.registers().pc);
            break StopReason::StepLimit;
        }

        cpu.step()?;
        steps += 1;
    };

    if debug_timing {
        let elapsed = start_time.elapsed();
        let instructions_per_second = steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        log::info!(
            "Executed {steps} instructions in {elapsed:?} ({instructions_per_second:.0} instructions/sec)"
        );
    }

    Ok((steps, stop_reason))
}
