use std::io::{self, Write};

use dtmfscan::FrameReport;

/// Print the decode one line per elapsed second of audio.
///
/// Frames of the first second are printed bare. Every later second starts a
/// new line prefixed with its `m:ss`. Frames without a recognized key print
/// `.`, frames that emit a key print the key, held keys print nothing.
pub fn write_timeline<W: Write>(out: &mut W, reports: &[FrameReport]) -> io::Result<()> {
    let mut current_second = 0u64;
    for report in reports {
        let second = report.start_seconds.floor() as u64;
        if second > current_second {
            write!(out, "\n{}:{:02} ", second / 60, second % 60)?;
            current_second = second;
        }
        match (report.symbol, report.emitted) {
            (None, _) => write!(out, ".")?,
            (Some(_), Some(ch)) => write!(out, "{ch}")?,
            (Some(_), None) => {}
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtmfscan::FrameTones;

    fn report(index: usize, seconds: f64, symbol: Option<char>, emitted: Option<char>) -> FrameReport {
        FrameReport {
            index,
            start_sample: index,
            start_seconds: seconds,
            tones: FrameTones::default(),
            symbol,
            emitted,
        }
    }

    fn render(reports: &[FrameReport]) -> String {
        let mut out = Vec::new();
        write_timeline(&mut out, reports).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn groups_frames_by_second() {
        let reports = [
            report(0, 0.0, None, None),
            report(1, 0.5, Some('4'), Some('4')),
            report(2, 0.9, Some('4'), None),
            report(3, 1.2, None, None),
            report(4, 1.6, Some('2'), Some('2')),
            report(5, 61.0, Some('2'), None),
            report(6, 61.5, None, None),
        ];
        assert_eq!(render(&reports), ".4\n0:01 .2\n1:01 .\n");
    }

    #[test]
    fn first_second_has_no_header() {
        let reports = [
            report(0, 0.0, Some('7'), Some('7')),
            report(1, 0.04, Some('7'), None),
            report(2, 0.08, None, None),
        ];
        assert_eq!(render(&reports), "7.\n");
    }

    #[test]
    fn empty_decode_is_a_blank_line() {
        assert_eq!(render(&[]), "\n");
    }
}
