use crate::generator::MatrixBuilder;
use crate::types::{ErrorCorrection, MaskPattern};

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Whether the mask inverts the module at (x, y).
pub(crate) fn mask_bit(pattern: MaskPattern, x: usize, y: usize) -> bool {
    match pattern {
        MaskPattern::Pattern0 => (x + y) % 2 == 0,
        MaskPattern::Pattern1 => y % 2 == 0,
        MaskPattern::Pattern2 => x % 3 == 0,
        MaskPattern::Pattern3 => (x + y) % 3 == 0,
        MaskPattern::Pattern4 => (x / 3 + y / 2) % 2 == 0,
        MaskPattern::Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
        MaskPattern::Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
        MaskPattern::Pattern7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
    }
}

/// XORs the mask over every non-function module. Applying the same mask a
/// second time restores the grid.
pub(crate) fn apply_mask(builder: &mut MatrixBuilder, pattern: MaskPattern) {
    for y in 0..builder.size {
        for x in 0..builder.size {
            if !builder.is_function[y][x] && mask_bit(pattern, x, y) {
                builder.modules[y][x] = !builder.modules[y][x];
            }
        }
    }
}

/// Tries all eight masks and returns the one with the lowest penalty score,
/// ties going to the lower pattern number. Format bits are burned in for
/// each candidate because they count toward the score; the grid is restored
/// after each trial, so the caller still has to apply the winner.
pub(crate) fn choose_mask(
    builder: &mut MatrixBuilder,
    ecl: ErrorCorrection,
    requested: Option<MaskPattern>,
) -> MaskPattern {
    if let Some(pattern) = requested {
        return pattern;
    }
    let mut best = MaskPattern::Pattern0;
    let mut min_penalty = i32::MAX;
    for pattern in MaskPattern::ALL {
        apply_mask(builder, pattern);
        builder.draw_format_bits(ecl, pattern);
        let penalty = penalty_score(builder);
        if penalty < min_penalty {
            best = pattern;
            min_penalty = penalty;
        }
        apply_mask(builder, pattern);
    }
    best
}

/// Rolling history of the last seven run lengths in one line, used to spot
/// the 1:1:3:1:1 finder signature. Both ends of a line act as a light run
/// the full width of the symbol.
struct RunHistory {
    size: i32,
    runs: [i32; 7],
}

impl RunHistory {
    fn new(size: i32) -> Self {
        Self { size, runs: [0; 7] }
    }

    fn add(&mut self, mut run_len: i32) {
        if self.runs[0] == 0 {
            run_len += self.size; // virtual light run before the first module
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = run_len;
    }

    /// Counts finder-like 1:1:3:1:1 occurrences ending at the run in
    /// `runs[0]`; a pattern scores once per side with a light border of at
    /// least four modules, so it can count twice.
    fn count_patterns(&self) -> i32 {
        let r = &self.runs;
        let n = r[1];
        debug_assert!(n <= self.size * 3);
        let core = n > 0 && r[2] == n && r[3] == n * 3 && r[4] == n && r[5] == n;
        i32::from(core && r[0] >= n * 4 && r[6] >= n)
            + i32::from(core && r[6] >= n * 4 && r[0] >= n)
    }

    fn terminate_and_count(mut self, run_color: bool, mut run_len: i32) -> i32 {
        if run_color {
            self.add(run_len);
            run_len = 0;
        }
        self.add(run_len + self.size);
        self.count_patterns()
    }
}

/// The four-term penalty score used to rank mask candidates.
pub(crate) fn penalty_score(builder: &MatrixBuilder) -> i32 {
    let size = builder.size;
    let n = size as i32;
    let mut result = 0;

    // Runs of identical modules along each row, plus finder lookalikes
    for y in 0..size {
        let mut run_color = false;
        let mut run_len = 0i32;
        let mut history = RunHistory::new(n);
        for x in 0..size {
            if builder.modules[y][x] == run_color {
                run_len += 1;
                if run_len == 5 {
                    result += PENALTY_N1;
                } else if run_len > 5 {
                    result += 1;
                }
            } else {
                history.add(run_len);
                if !run_color {
                    result += history.count_patterns() * PENALTY_N3;
                }
                run_color = builder.modules[y][x];
                run_len = 1;
            }
        }
        result += history.terminate_and_count(run_color, run_len) * PENALTY_N3;
    }

    // Same along each column
    for x in 0..size {
        let mut run_color = false;
        let mut run_len = 0i32;
        let mut history = RunHistory::new(n);
        for y in 0..size {
            if builder.modules[y][x] == run_color {
                run_len += 1;
                if run_len == 5 {
                    result += PENALTY_N1;
                } else if run_len > 5 {
                    result += 1;
                }
            } else {
                history.add(run_len);
                if !run_color {
                    result += history.count_patterns() * PENALTY_N3;
                }
                run_color = builder.modules[y][x];
                run_len = 1;
            }
        }
        result += history.terminate_and_count(run_color, run_len) * PENALTY_N3;
    }

    // 2x2 blocks of a single color
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color = builder.modules[y][x];
            if color == builder.modules[y][x + 1]
                && color == builder.modules[y + 1][x]
                && color == builder.modules[y + 1][x + 1]
            {
                result += PENALTY_N2;
            }
        }
    }

    // Dark/light balance, 10 points per 5% deviation from half
    let dark = builder
        .modules
        .iter()
        .flatten()
        .filter(|&&module| module)
        .count() as i32;
    let total = n * n;
    let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    result += k * PENALTY_N4;

    result
}
