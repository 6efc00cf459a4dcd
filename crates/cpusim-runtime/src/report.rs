use cpusim_core::Summary;
use std::io::{self, Write};

/// Renders one algorithm's block of the statistics file.
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Algorithm {}\n\
         -- average CPU burst time: {:.2} ms\n\
         -- average wait time: {:.2} ms\n\
         -- average turnaround time: {:.2} ms\n\
         -- total number of context switches: {}\n\
         -- total number of preemptions: {}\n",
        summary.algorithm,
        summary.avg_burst,
        summary.avg_wait,
        summary.avg_turnaround,
        summary.context_switches,
        summary.preemptions,
    )
}

pub fn write_summaries<W: Write>(out: &mut W, summaries: &[Summary]) -> io::Result<()> {
    for summary in summaries {
        out.write_all(render_summary(summary).as_bytes())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpusim_core::{Algorithm, Statistics};

    fn summary(algorithm: Algorithm) -> Summary {
        Summary {
            algorithm,
            avg_burst: 4.0,
            avg_wait: 4.0,
            avg_turnaround: 8.0,
            context_switches: 2,
            preemptions: 0,
            totals: Statistics::default(),
            end_tick: 16,
        }
    }

    #[test]
    fn renders_two_decimal_averages() {
        let mut s = summary(Algorithm::Srt);
        s.avg_burst = 10.0 / 3.0;

        let text = render_summary(&s);
        assert_eq!(
            text,
            "Algorithm SRT\n\
             -- average CPU burst time: 3.33 ms\n\
             -- average wait time: 4.00 ms\n\
             -- average turnaround time: 8.00 ms\n\
             -- total number of context switches: 2\n\
             -- total number of preemptions: 0\n"
        );
    }

    #[test]
    fn writes_blocks_in_order() {
        let summaries = [summary(Algorithm::Fcfs), summary(Algorithm::RoundRobin)];
        let mut out = Vec::new();
        write_summaries(&mut out, &summaries).unwrap();

        let text = String::from_utf8(out).unwrap();
        let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("Algorithm")).collect();
        assert_eq!(headers, ["Algorithm FCFS", "Algorithm RR"]);
    }
}
