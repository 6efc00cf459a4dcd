use cpusim_core::{EventKind, TraceEvent};
use std::io::{self, Write};

/// Turns a trace into `time <t>ms: <message>` lines.
pub fn narrate(trace: &[TraceEvent]) -> Vec<String> {
    let mut lines = Vec::with_capacity(trace.len());
    let mut events = trace.iter().peekable();

    while let Some(event) = events.next() {
        let message = match &event.kind {
            EventKind::SimulatorStarted { algorithm } => {
                format!("Simulator started for {}", algorithm)
            }
            EventKind::ProcessArrived { pid } => {
                format!("Process {} arrived and added to ready queue", pid)
            }
            EventKind::IoCompleted { pid } => {
                format!("Process {} completed I/O; added to ready queue", pid)
            }
            EventKind::Dispatched {
                pid,
                remaining,
                burst_length,
            } => {
                if remaining < burst_length {
                    format!(
                        "Process {} started using the CPU with {}ms burst remaining",
                        pid, remaining
                    )
                } else {
                    format!(
                        "Process {} started using the CPU for {}ms burst",
                        pid, burst_length
                    )
                }
            }
            EventKind::BurstCompleted { pid, bursts_left } => {
                let noun = if *bursts_left == 1 { "burst" } else { "bursts" };
                format!(
                    "Process {} completed a CPU burst; {} {} to go",
                    pid, bursts_left, noun
                )
            }
            EventKind::IoBlocked { pid, until } => format!(
                "Process {} switching out of CPU; will block on I/O until time {}ms",
                pid, until
            ),
            EventKind::ProcessTerminated { pid } => format!("Process {} terminated", pid),
            EventKind::TimeSliceExpired { pid, remaining } => {
                let preempted = events.next_if(|next| {
                    next.tick == event.tick
                        && matches!(&next.kind, EventKind::Preempted { pid: p, .. } if p == pid)
                });
                if preempted.is_some() {
                    format!(
                        "Time slice expired; process {} preempted with {}ms to go",
                        pid, remaining
                    )
                } else {
                    "Time slice expired; no preemption because ready queue is empty".to_string()
                }
            }
            EventKind::Preempted {
                pid,
                remaining,
                by: Some(by),
            } => format!(
                "Process {} will preempt {}; {} preempted with {}ms to go",
                by, pid, pid, remaining
            ),
            EventKind::Preempted {
                pid,
                remaining,
                by: None,
            } => format!("Process {} preempted with {}ms to go", pid, remaining),
            EventKind::SimulatorEnded { algorithm } => {
                format!("Simulator ended for {}", algorithm)
            }
        };

        lines.push(format!("time {}ms: {}", event.tick, message));
    }

    lines
}

pub fn write_narration(out: &mut dyn Write, trace: &[TraceEvent]) -> io::Result<()> {
    for line in narrate(trace) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpusim_core::{Algorithm, Pid};

    fn at(tick: u64, kind: EventKind) -> TraceEvent {
        TraceEvent { tick, kind }
    }

    #[test]
    fn merges_expiry_with_its_preemption() {
        let a = Pid::from("A");
        let trace = [
            at(
                4,
                EventKind::TimeSliceExpired {
                    pid: a.clone(),
                    remaining: 2,
                },
            ),
            at(
                4,
                EventKind::Preempted {
                    pid: a,
                    remaining: 2,
                    by: None,
                },
            ),
        ];

        assert_eq!(
            narrate(&trace),
            ["time 4ms: Time slice expired; process A preempted with 2ms to go"]
        );
    }

    #[test]
    fn expiry_without_preemption_stands_alone() {
        let trace = [
            at(
                8,
                EventKind::TimeSliceExpired {
                    pid: Pid::from("A"),
                    remaining: 2,
                },
            ),
            at(10, EventKind::ProcessTerminated { pid: Pid::from("A") }),
        ];

        let lines = narrate(&trace);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("no preemption because ready queue is empty"));
        assert_eq!(lines[1], "time 10ms: Process A terminated");
    }

    #[test]
    fn names_the_preempting_process() {
        let trace = [at(
            10,
            EventKind::Preempted {
                pid: Pid::from("Y"),
                remaining: 6,
                by: Some(Pid::from("X")),
            },
        )];

        assert_eq!(
            narrate(&trace),
            ["time 10ms: Process X will preempt Y; Y preempted with 6ms to go"]
        );
    }

    #[test]
    fn distinguishes_resumed_bursts() {
        let trace = [
            at(0, EventKind::SimulatorStarted { algorithm: Algorithm::Srt }),
            at(
                2,
                EventKind::Dispatched {
                    pid: Pid::from("A"),
                    remaining: 5,
                    burst_length: 5,
                },
            ),
            at(
                9,
                EventKind::Dispatched {
                    pid: Pid::from("A"),
                    remaining: 3,
                    burst_length: 5,
                },
            ),
        ];

        let mut out = Vec::new();
        write_narration(&mut out, &trace).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "time 0ms: Simulator started for SRT\n\
             time 2ms: Process A started using the CPU for 5ms burst\n\
             time 9ms: Process A started using the CPU with 3ms burst remaining\n"
        );
    }
}
