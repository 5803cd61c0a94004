use core::fmt::{self, Write as _};

use super::Matrix;

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.rows;
        let n = self.cols;
        if m == 0 || n == 0 {
            return write!(f, "[{}x{} matrix]", m, n);
        }

        // Measure column widths
        let mut widths: Vec<usize> = vec![0; n];
        for (k, x) in self.data.iter().enumerate() {
            let w = WriteCounting::count(|wc| write!(wc, "{}", x));
            let j = k % n;
            if w > widths[j] {
                widths[j] = w;
            }
        }

        for i in 0..m {
            write!(f, "│")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", self[(i, j)], width = widths[j])?;
            }
            write!(f, "│")?;
            if i < m - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_aligns_columns() {
        let m = Matrix::from_2d(&[[1.0, -20.5], [300.0, 4.0]]).unwrap();
        let s = format!("{}", m);
        assert_eq!(s, "│  1  -20.5│\n│300      4│");
    }

    #[test]
    fn display_empty() {
        let m = Matrix::<f64>::new(0, 3);
        assert_eq!(format!("{}", m), "[0x3 matrix]");
    }
}
