use std::fmt::Write;

use crate::advisor::{Advice, CompensationOutcome, WindOutcome};
use crate::wind::{compass16, WindSide};

/// Tekstrapport for en anbefaling (terminal/logg).
pub fn render_report(advice: &Advice) -> String {
    let mut out = String::new();
    let b = &advice.baseline;

    // writeln! til String kan ikke feile
    let _ = writeln!(out, "--- Tire Pressure ---");
    let _ = writeln!(
        out,
        "Front: {:.1} psi ({:.2} bar)  [{:.1} lbs]",
        b.front_psi, b.front_bar, b.front_load_lbs
    );
    let _ = writeln!(
        out,
        "Rear:  {:.1} psi ({:.2} bar)  [{:.1} lbs]",
        b.rear_psi, b.rear_bar, b.rear_load_lbs
    );

    match &advice.compensation {
        CompensationOutcome::Available(c) => {
            let _ = writeln!(
                out,
                "Adjusted for {:.1} °C @ {:.0} m ({:.2} psi ambient): front {:.1} psi ({:.2} bar), rear {:.1} psi ({:.2} bar)",
                c.ambient_temp_c,
                c.elevation_m,
                c.ambient_pressure_psi,
                c.front_psi,
                c.front_bar,
                c.rear_psi,
                c.rear_bar
            );
        }
        CompensationOutcome::Unavailable { reason } => {
            let _ = writeln!(out, "Adjustment unavailable ({reason}), use the values above");
        }
    }

    let _ = writeln!(out, "--- Wind ---");
    match &advice.wind {
        WindOutcome::Available { observation, headings, components } => {
            let gust = observation
                .gust
                .map(|g| format!(", gusts {g:.1}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "Wind from {} ({:.0}°) at {:.1}{}",
                compass16(observation.from_deg),
                observation.from_deg,
                observation.speed,
                gust
            );
            for (i, h) in headings.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}. head {} ({:.0}°): tail {:+.1}, cross {:.1}, score {:.2}",
                    i + 1,
                    h.compass,
                    h.heading_deg,
                    h.tail,
                    h.cross,
                    h.score
                );
            }
            if let Some(c) = components {
                let side = match c.side {
                    WindSide::Left => " from the left",
                    WindSide::Right => " from the right",
                    WindSide::None => "",
                };
                let _ = writeln!(
                    out,
                    "On your heading: {} (head {:+.1}, cross {:.1}{})",
                    c.kind, c.headwind, c.crosswind, side
                );
            }
        }
        WindOutcome::NoData { reason } => {
            let _ = writeln!(out, "No wind data ({reason})");
        }
    }
    out
}

pub fn print_report(advice: &Advice) {
    print!("{}", render_report(advice));
}
