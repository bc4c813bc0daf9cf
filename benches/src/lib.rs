//! Общие входные данные для бенчмарков.

/// `n` строк в формате микроконтроллера; каждая `bad_every`-я — битая.
pub fn sensor_lines(
    n: usize,
    delimiter: char,
    bad_every: usize,
) -> Vec<String> {
    (0..n)
        .map(|i| {
            if bad_every > 0 && i % bad_every == bad_every - 1 {
                format!("#?{delimiter}3.2971{delimiter}25.43\r\n")
            } else {
                format!(
                    "{:.4}{delimiter}{:.4}{delimiter}{:.2}\r\n",
                    (i as f64 * 1e-3).sin(),
                    3.3 + (i % 7) as f64 * 1e-3,
                    25.0 + (i % 11) as f64 * 0.01,
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tmrlog_types::parse_line;

    use super::*;

    #[test]
    fn test_sensor_lines_mix() {
        let lines = sensor_lines(100, 'x', 10);
        let ok = lines.iter().filter(|l| parse_line(l, 'x').is_ok()).count();

        assert_eq!(lines.len(), 100);
        assert_eq!(ok, 90);
    }
}
