// DAQ CLI - Console rendering
// Copyright (c) 2025 Omar El-Gohary
//
// Licensed under AGPL-3.0.

//! Console rendering of cycle reports.

use daq::CycleReport;

pub const BANNER: &str = "--- INDUSTRIAL DAQ SYSTEM STARTED ---\n--- APPLYING MOVING AVERAGE FILTER ---\n";
pub const SEPARATOR: &str = "-----------------------------------";

/// Significant digits shown for smoothed values.
const PRECISION: i32 = 6;

/// Format a value with six significant digits, trailing zeros removed.
/// Exponents below -4 or at least 6 switch to `1.5e+06` notation.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return value.to_string();
    }

    // Rounding to the shown precision decides the exponent (999999.7 -> 1e+06).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs());
    }

    let decimals = (PRECISION - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, value))
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Render one cycle as console lines.
pub fn render_cycle(report: &CycleReport) -> String {
    let mut out = format!("Cycle {}:\n", report.cycle);
    for r in &report.readings {
        out.push_str(&format!(
            "Sensor {} [{}] Filtered Output: {}\n",
            r.sensor_id,
            r.label,
            format_value(r.smoothed)
        ));
        if let Some(alert) = &r.alert {
            out.push_str(&format!(" >> ALERT: {}\n", alert));
        }
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}
