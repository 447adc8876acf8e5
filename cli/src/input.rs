//! Keyboard decoding and terminal raw mode.

use tile_slide_core::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Move(Direction),
    Restart,
    Quit,
    None,
}

/// Map the bytes of one key press to an action. Unmapped keys yield `None`.
pub fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // q, Ctrl+C, lone Esc
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit,
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

/// Puts stdin into non-canonical, no-echo mode until dropped.
pub struct RawMode {
    #[cfg(unix)]
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    pub fn enable() -> anyhow::Result<Self> {
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        // SAFETY: termios is plain data and tcgetattr fully initializes it on success.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
            anyhow::bail!(
                "stdin is not a terminal: {}",
                std::io::Error::last_os_error()
            );
        }
        let original = termios;

        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) } != 0 {
            anyhow::bail!(
                "failed to enter raw mode: {}",
                std::io::Error::last_os_error()
            );
        }

        Ok(RawMode { original })
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[cfg(not(unix))]
impl RawMode {
    /// Without termios, input needs Enter after each key.
    pub fn enable() -> anyhow::Result<Self> {
        Ok(RawMode {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(parse_input(&[27, 91, 65]), InputAction::Move(Direction::Up));
        assert_eq!(parse_input(&[27, 91, 66]), InputAction::Move(Direction::Down));
        assert_eq!(parse_input(&[27, 91, 67]), InputAction::Move(Direction::Right));
        assert_eq!(parse_input(&[27, 91, 68]), InputAction::Move(Direction::Left));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(parse_input(b"w"), InputAction::Move(Direction::Up));
        assert_eq!(parse_input(b"S"), InputAction::Move(Direction::Down));
        assert_eq!(parse_input(b"a"), InputAction::Move(Direction::Left));
        assert_eq!(parse_input(b"D"), InputAction::Move(Direction::Right));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(parse_input(b"q"), InputAction::Quit);
        assert_eq!(parse_input(&[3]), InputAction::Quit);
        assert_eq!(parse_input(&[27]), InputAction::Quit);
        assert_eq!(parse_input(b"r"), InputAction::Restart);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(parse_input(b"x"), InputAction::None);
        assert_eq!(parse_input(&[27, 91, 69]), InputAction::None);
        assert_eq!(parse_input(b""), InputAction::None);
    }
}
