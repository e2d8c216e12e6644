//! Real FFT of table columns
//!
//! A transformed table has an `f` column in Hz and one `ft_<name>` column
//! per transformed column. Rows hold the real part of each spectrum and the
//! imaginary parts travel alongside in [`FourierSpace`].

use crate::error::{Error, Result};
use crate::rename::TIME_COLUMN;
use crate::table::Table;
use log::debug;
use realfft::num_complex::Complex;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the frequency column of a transformed table
pub const FREQUENCY_COLUMN: &str = "f";

/// Prefix of transformed column names
pub const FT_PREFIX: &str = "ft_";

/// What a transformed table remembers about its real-space origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourierSpace {
    /// Range and sample count of the real-space independent variable
    pub realspace_x: RealspaceX,
    /// Imaginary part of each `ft_` column, keyed by column name
    pub imaginary: BTreeMap<String, Vec<f64>>,
}

/// `[min, max]` and sample count of a real-space axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealspaceX {
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl RealspaceX {
    /// `n` evenly spaced points from `min` to `max`, both included
    pub fn linspace(&self) -> Vec<f64> {
        match self.n {
            0 => Vec::new(),
            1 => vec![self.min],
            n => {
                let step = (self.max - self.min) / (n - 1) as f64;
                (0..n).map(|i| self.min + step * i as f64).collect()
            }
        }
    }
}

/// Forward transform of `y` (default: every column but `x`) against `x`
/// (default: the table's own independent variable).
pub fn rfft(table: &Table, x: Option<&str>, y: Option<&[&str]>) -> Result<Table> {
    let x = independent(table, x)?;
    let y = dependent(table, x, y)?;
    let dx = table.spacing(x)?;

    let xs = table.values_of(x)?;
    let n = xs.len();
    let bins = n / 2 + 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(n);

    let mut columns = vec![FREQUENCY_COLUMN.to_string()];
    let mut data: Vec<Vec<f64>> = vec![(0..bins).map(|k| k as f64 / (n as f64 * dx)).collect()];
    let mut units = table.units.as_ref().map(|_| vec!["Hz".to_string()]);
    let mut imaginary = BTreeMap::new();

    for name in &y {
        let mut input = table.values_of(name)?;
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)?;

        let ft_name = format!("{FT_PREFIX}{name}");
        data.push(spectrum.iter().map(|c| c.re).collect());
        imaginary.insert(ft_name.clone(), spectrum.iter().map(|c| c.im).collect());
        if let Some(units) = &mut units {
            units.push(format!("({})^-1", table.unit(name).unwrap_or_default()));
        }
        columns.push(ft_name);
    }

    let realspace_x = RealspaceX {
        min: xs.iter().copied().fold(f64::INFINITY, f64::min),
        max: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        n,
    };
    debug!(
        "rfft of {} column(s) over '{}' ({} samples, dx = {:e})",
        y.len(),
        x,
        n,
        dx
    );

    let mut transformed = Table::build(
        columns,
        rows_from_columns(&data, bins),
        units,
        table.sources.clone(),
    )?;
    transformed.x = Some(FREQUENCY_COLUMN.to_string());
    transformed.fourier = Some(FourierSpace {
        realspace_x,
        imaginary,
    });
    Ok(transformed)
}

/// Inverse of [`rfft`]. The result has a `t` column in seconds rebuilt from
/// the recorded real-space range, and drops the `ft_` prefixes and the
/// `(...)^-1` units.
pub fn irfft(table: &Table, x: Option<&str>, y: Option<&[&str]>) -> Result<Table> {
    let fourier = table.fourier.as_ref().ok_or(Error::NotFourierSpace)?;
    let x = independent(table, x)?;
    let y = dependent(table, x, y)?;

    let realspace = fourier.realspace_x;
    let n = realspace.n;
    if n < 2 {
        return Err(Error::TooFewRows {
            column: TIME_COLUMN.to_string(),
            needed: 2,
            found: n,
        });
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let c2r = planner.plan_fft_inverse(n);

    let mut columns = vec![TIME_COLUMN.to_string()];
    let mut data: Vec<Vec<f64>> = vec![realspace.linspace()];
    let mut units = table.units.as_ref().map(|_| vec!["s".to_string()]);

    for name in &y {
        let re = table.values_of(name)?;
        let im = fourier.imaginary.get(name.as_str());
        let mut spectrum: Vec<Complex<f64>> = re
            .iter()
            .enumerate()
            .map(|(k, &re)| Complex::new(re, im.and_then(|v| v.get(k)).copied().unwrap_or(0.0)))
            .collect();

        // the zero and Nyquist bins of a real signal are real
        if let Some(first) = spectrum.first_mut() {
            first.im = 0.0;
        }
        if n % 2 == 0 {
            if let Some(last) = spectrum.last_mut() {
                last.im = 0.0;
            }
        }

        let mut output = c2r.make_output_vec();
        c2r.process(&mut spectrum, &mut output)?;
        data.push(output.iter().map(|v| v / n as f64).collect());

        if let Some(units) = &mut units {
            let unit = table.unit(name).unwrap_or_default();
            let stripped = unit
                .strip_prefix('(')
                .and_then(|u| u.strip_suffix(")^-1"))
                .unwrap_or(unit);
            units.push(stripped.to_string());
        }
        columns.push(name.strip_prefix(FT_PREFIX).unwrap_or(name).to_string());
    }

    debug!("irfft of {} column(s) back to {} samples", y.len(), n);

    let mut restored = Table::build(
        columns,
        rows_from_columns(&data, n),
        units,
        table.sources.clone(),
    )?;
    restored.x = Some(TIME_COLUMN.to_string());
    Ok(restored)
}

fn independent<'a>(table: &'a Table, x: Option<&'a str>) -> Result<&'a str> {
    let x = x
        .or(table.x.as_deref())
        .ok_or(Error::NoIndependentVariable)?;
    if table.find_column(x).is_none() {
        return Err(Error::ColumnNotFound(x.to_string()));
    }
    Ok(x)
}

fn dependent(table: &Table, x: &str, y: Option<&[&str]>) -> Result<Vec<String>> {
    match y {
        Some(names) => names
            .iter()
            .map(|name| {
                table
                    .find_column(name)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
            })
            .collect(),
        None => Ok(table
            .columns
            .iter()
            .filter(|c| c.name != x)
            .map(|c| c.name.clone())
            .collect()),
    }
}

fn rows_from_columns(data: &[Vec<f64>], len: usize) -> Vec<Vec<f64>> {
    (0..len)
        .map(|i| data.iter().map(|col| col[i]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use std::path::PathBuf;

    const DT: f64 = 1e-12;

    /// Eight samples of a cosine at a quarter of the sample rate
    fn oscillation() -> Table {
        let rows = (0..8)
            .map(|k| {
                let t = k as f64 * DT;
                vec![t, (PI * k as f64 / 2.0).cos(), -1.0 - k as f64]
            })
            .collect();

        Table::build(
            vec!["t".to_string(), "mx".to_string(), "E".to_string()],
            rows,
            Some(vec!["s".to_string(), "".to_string(), "J".to_string()]),
            vec![PathBuf::from("precession.odt")],
        )
        .unwrap()
        .with_x("t")
        .unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() <= tol, "{x} != {y}");
        }
    }

    #[test]
    fn test_rfft_columns_and_units() {
        let ft = oscillation().rfft(None, None).unwrap();

        assert_eq!(ft.column_names(), vec!["f", "ft_mx", "ft_E"]);
        assert_eq!(ft.row_count(), 5);
        assert_eq!(ft.x.as_deref(), Some("f"));
        assert_eq!(ft.unit("f"), Some("Hz"));
        assert_eq!(ft.unit("ft_mx"), Some("()^-1"));
        assert_eq!(ft.unit("ft_E"), Some("(J)^-1"));
        assert!(ft.is_fourierspace());

        let fourier = ft.fourier.as_ref().unwrap();
        assert_eq!(
            fourier.realspace_x,
            RealspaceX {
                min: 0.0,
                max: 7.0 * DT,
                n: 8
            }
        );

        let f = ft.column_values("f").unwrap();
        assert_close(&f, &[0.0, 1.25e11, 2.5e11, 3.75e11, 5e11], 1.0);
    }

    #[test]
    fn test_rfft_peak() {
        let ft = oscillation().rfft(None, Some(&["mx"])).unwrap();
        assert_eq!(ft.column_names(), vec!["f", "ft_mx"]);

        let re = ft.column_values("ft_mx").unwrap();
        let im = &ft.fourier.as_ref().unwrap().imaginary["ft_mx"];
        assert_close(&re, &[0.0, 0.0, 4.0, 0.0, 0.0], 1e-9);
        assert_close(im, &[0.0; 5], 1e-9);
    }

    #[test]
    fn test_irfft_restores_table() {
        let table = oscillation();
        let restored = table.rfft(None, None).unwrap().irfft(None, None).unwrap();

        assert_eq!(restored.column_names(), vec!["t", "mx", "E"]);
        assert_eq!(restored.x.as_deref(), Some("t"));
        assert!(!restored.is_fourierspace());
        assert_eq!(restored.unit("t"), Some("s"));
        assert_eq!(restored.unit("mx"), Some(""));
        assert_eq!(restored.unit("E"), Some("J"));

        for name in ["t", "mx", "E"] {
            let tol = if name == "t" { 1e-24 } else { 1e-9 };
            assert_close(
                &restored.column_values(name).unwrap(),
                &table.column_values(name).unwrap(),
                tol,
            );
        }
    }

    #[test]
    fn test_irfft_odd_length() {
        let table = Table::build(
            vec!["t".to_string(), "my".to_string()],
            vec![
                vec![0.0, 0.3],
                vec![1.0, -0.1],
                vec![2.0, 0.7],
                vec![3.0, 0.2],
                vec![4.0, -0.4],
            ],
            None,
            vec![],
        )
        .unwrap()
        .with_x("t")
        .unwrap();

        let ft = table.rfft(None, None).unwrap();
        assert_eq!(ft.row_count(), 3);
        assert!(ft.units.is_none());

        let restored = ft.irfft(None, None).unwrap();
        assert_close(
            &restored.column_values("my").unwrap(),
            &[0.3, -0.1, 0.7, 0.2, -0.4],
            1e-9,
        );
        assert!(restored.units.is_none());
    }

    #[test]
    fn test_irfft_requires_fourier_table() {
        let err = oscillation().irfft(Some("t"), None).unwrap_err();
        assert!(matches!(err, Error::NotFourierSpace));
    }

    #[test]
    fn test_rfft_requires_independent_variable() {
        let mut table = oscillation();
        table.set_x(None).unwrap();

        assert!(matches!(
            table.rfft(None, None),
            Err(Error::NoIndependentVariable)
        ));
        assert!(table.rfft(Some("t"), Some(&["mx"])).is_ok());
        assert!(matches!(
            table.rfft(Some("iteration"), None),
            Err(Error::ColumnNotFound(c)) if c == "iteration"
        ));
    }

    #[test]
    fn test_rfft_uneven_spacing() {
        let table = Table::build(
            vec!["t".to_string(), "mx".to_string()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![3.0, -1.0]],
            None,
            vec![],
        )
        .unwrap();

        assert!(matches!(
            table.rfft(Some("t"), None),
            Err(Error::UnevenSpacing { column }) if column == "t"
        ));
    }

    #[test]
    fn test_linspace() {
        let axis = RealspaceX {
            min: 1.0,
            max: 2.0,
            n: 5,
        };
        assert_eq!(axis.linspace(), vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert!(RealspaceX { n: 0, ..axis }.linspace().is_empty());
    }
}
