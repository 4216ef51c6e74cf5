/*
## Built-in Commands

* `cd <path>` makes 'path' the current directory
* `exit` terminates the shell

If a built-in conflicts with the name of an external program, the built-in prevails.
*/
pub const EXIT_VERB: &str = "exit";
pub const CHANGE_DIR_VERB: &str = "cd";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    ChangeDir,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            EXIT_VERB => Some(Builtin::Exit),
            CHANGE_DIR_VERB => Some(Builtin::ChangeDir),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Exit => EXIT_VERB,
            Builtin::ChangeDir => CHANGE_DIR_VERB,
        }
    }
}
