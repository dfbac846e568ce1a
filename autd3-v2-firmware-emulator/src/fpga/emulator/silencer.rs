use super::FPGAEmulator;

fn step_duty(current: u16, target: u16, step: u32) -> u16 {
    if current < target {
        (current as u32 + step).min(target as u32) as u16
    } else {
        (current as u32).saturating_sub(step).max(target as u32) as u16
    }
}

// Phase wraps at `cycle`, so it moves along the shorter arc.
fn step_phase(current: u16, target: u16, cycle: u16, step: u32) -> u16 {
    let cycle = cycle as u32;
    let current = current as u32 % cycle;
    let forward = (target as u32 + cycle - current) % cycle;
    let next = if forward <= cycle / 2 {
        current + forward.min(step)
    } else {
        current + cycle - (cycle - forward).min(step)
    };
    (next % cycle) as u16
}

impl FPGAEmulator {
    pub const fn silencer_cycle(&self) -> u16 {
        self.silencer_cycle
    }

    pub const fn silencer_step(&self) -> u16 {
        self.silencer_step
    }

    pub(crate) fn step_silencer(&mut self, updates: u128) {
        if updates == 0 {
            return;
        }
        let step = (self.silencer_step as u128 * updates).min(u32::MAX as u128) as u32;
        let targets = self.target_drives();
        self.emitted
            .iter_mut()
            .zip(targets)
            .zip(self.cycles.iter())
            .for_each(|((out, (duty, phase)), &cycle)| {
                *out = (
                    step_duty(out.0, duty, step),
                    step_phase(out.1, phase, cycle, step),
                );
            });
    }

    pub(crate) fn reset_output(&mut self) {
        self.emitted.fill((0, 0));
    }
}
