//! Loggers of solver progress

/// Line-oriented sink of printed iteration stats.
///
/// [`crate::solver::Solver::solve_with_logger`] hands each printed line to this trait,
/// so the destination is up to the caller.
pub trait StatsLogger
{
    /// Consumes one formatted line, without a trailing newline.
    fn log_line(&mut self, line: &str);
}

//

/// Logger discarding everything.
pub struct NullLogger;

impl StatsLogger for NullLogger
{
    fn log_line(&mut self, _line: &str)
    {
    }
}

//

/// Logger forwarding to the `log` crate at info level.
///
/// Use any logger crate (`env_logger` etc.) to see the output.
pub struct LogLogger;

impl StatsLogger for LogLogger
{
    fn log_line(&mut self, line: &str)
    {
        log::info!("{}", line);
    }
}

//

/// Logger with a `std::io::Write` implementor.
///
/// Example of a logger writing to the standard output.
/// ```
/// use pdhg_lp::logger::{IoWriteLogger, StatsLogger};
///
/// let mut stdout = std::io::stdout();
/// let mut logger = IoWriteLogger(&mut stdout);
/// logger.log_line("hello");
/// ```
pub struct IoWriteLogger<'a, W: std::io::Write>(pub &'a mut W);

impl<'a, W: std::io::Write> StatsLogger for IoWriteLogger<'a, W>
{
    fn log_line(&mut self, line: &str)
    {
        // a broken sink shall not stop the solver
        if writeln!(self.0, "{}", line).and_then(|_| self.0.flush()).is_err() {
            log::warn!("IoWriteLogger: failed to write");
        }
    }
}

//

/// Collects lines in memory.
impl StatsLogger for Vec<String>
{
    fn log_line(&mut self, line: &str)
    {
        self.push(line.to_string());
    }
}

impl<T: StatsLogger + ?Sized> StatsLogger for &mut T
{
    fn log_line(&mut self, line: &str)
    {
        (**self).log_line(line);
    }
}

//

#[test]
fn test_io_write_logger()
{
    let mut buf = Vec::<u8>::new();
    {
        let mut logger = IoWriteLogger(&mut buf);
        logger.log_line("a");
        logger.log_line("b c");
    }
    assert_eq!(String::from_utf8(buf).unwrap(), "a\nb c\n");

    fn feed<S: StatsLogger>(mut logger: S)
    {
        logger.log_line("x");
    }

    let mut lines = Vec::<String>::new();
    feed(&mut lines);
    assert_eq!(lines, vec!["x".to_string()]);
}
