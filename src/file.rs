use std::fs;

use anyhow::{anyhow, bail, Context, Result};

use crate::astro::CentralBody;

/// Reads a whitespace-separated table of bodies, one per line, after a
/// header line:
///
/// ```text
/// name  mu  radius  rotation_period
/// ```
pub fn read_file(filename: &str) -> Result<Vec<CentralBody>> {
    let text = fs::read_to_string(filename).with_context(|| format!("reading {}", filename))?;
    parse_bodies(&text).with_context(|| format!("parsing {}", filename))
}

pub fn parse_bodies(text: &str) -> Result<Vec<CentralBody>> {
    let mut bodies = Vec::new();

    // Skip the header, and any blank lines
    for (line_number, line) in text.lines().enumerate().skip(1) {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 4 {
            bail!(
                "line {}: expected 4 fields, found {}",
                line_number + 1,
                fields.len()
            );
        }

        let parse_f64 = |index: usize| -> Result<f64> {
            fields[index].parse::<f64>().map_err(|e| {
                anyhow!("line {}: bad number {:?}: {}", line_number + 1, fields[index], e)
            })
        };

        bodies.push(CentralBody {
            name: fields[0].to_owned(),
            mu: parse_f64(1)?,
            radius: parse_f64(2)?,
            rotation_period: parse_f64(3)?,
        });
    }

    Ok(bodies)
}

pub fn find_body(bodies: Vec<CentralBody>, name: &str) -> Result<CentralBody> {
    bodies
        .into_iter()
        .find(|body| body.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("no body named {:?}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bodies() {
        let text = "name mu radius rotation_period\n\
                    Kerbin 3.5316e12 600000 21549.425\n\
                    \n\
                    Mun    6.5138398e10 200000 138984.38\n";
        let bodies = parse_bodies(text).unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].name, "Kerbin");
        assert_eq!(bodies[0].mu, 3.5316e12);
        assert_eq!(bodies[1].radius, 200_000.0);
        assert_eq!(bodies[1].rotation_period, 138_984.38);

        let mun = find_body(bodies, "mun").unwrap();
        assert_eq!(mun.name, "Mun");
    }

    #[test]
    fn test_parse_errors() {
        let short = "header\nKerbin 3.5316e12 600000\n";
        assert!(parse_bodies(short).unwrap_err().to_string().contains("line 2"));

        let garbage = "header\nKerbin lots 600000 21549.425\n";
        assert!(parse_bodies(garbage).is_err());

        assert!(find_body(vec![], "Eve").is_err());
    }

    #[test]
    fn test_shipped_table() {
        let bodies = read_file("ksp-bodies.txt").unwrap();
        let kerbin = find_body(bodies, "Kerbin").unwrap();
        assert_eq!(kerbin.mu, crate::consts::KERBIN_MU);
        assert_eq!(kerbin.radius, crate::consts::KERBIN_RADIUS);
    }
}
