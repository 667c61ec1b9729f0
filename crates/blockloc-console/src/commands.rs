//! Console command parsing.

use blockloc::{BlockPos, ChunkPos};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pos1(BlockPos),
    Pos2(BlockPos),
    Selection,
    Deselect,
    SetBlock(BlockPos, String),
    BlockLoc(String),
    Blocks(String),
    Load(ChunkPos),
    Unload(ChunkPos),
    Help,
    Quit,
    Empty,
    /// Known command, bad arguments; holds the usage line.
    Usage(&'static str),
    Unknown(String),
}

pub const HELP: &[(&str, &str)] = &[
    ("pos1 <x> <y> <z>", "Set the first selection corner"),
    ("pos2 <x> <y> <z>", "Set the second selection corner"),
    ("sel", "Show the current selection"),
    ("desel", "Clear the selection"),
    ("setblock <x> <y> <z> <type>", "Place a block"),
    ("blockloc <type>", "List every block of a type in the selection"),
    ("blocks [prefix]", "List block type names"),
    ("load <cx> <cz>", "Mark a chunk loaded"),
    ("unload <cx> <cz>", "Mark a chunk unloaded"),
    ("help", "Show this help"),
    ("quit", "Quit"),
];

fn parse_pos(args: &[&str]) -> Option<BlockPos> {
    match args {
        [x, y, z] => Some(BlockPos::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?)),
        _ => None,
    }
}

fn parse_chunk(args: &[&str]) -> Option<ChunkPos> {
    match args {
        [x, z] => Some(ChunkPos::new(x.parse().ok()?, z.parse().ok()?)),
        _ => None,
    }
}

/// Parse one input line. A leading `/` is ignored, and the command name
/// is case-insensitive; arguments are passed through untouched.
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let mut parts = trimmed.split_whitespace();
    let Some(name) = parts.next() else {
        return Command::Empty;
    };
    let args: Vec<&str> = parts.collect();

    match name.to_lowercase().as_str() {
        "pos1" => parse_pos(&args).map_or(Command::Usage("pos1 <x> <y> <z>"), Command::Pos1),
        "pos2" => parse_pos(&args).map_or(Command::Usage("pos2 <x> <y> <z>"), Command::Pos2),
        "sel" => Command::Selection,
        "desel" => Command::Deselect,
        "setblock" => match args.as_slice() {
            [x, y, z, kind] => parse_pos(&[*x, *y, *z]).map_or(
                Command::Usage("setblock <x> <y> <z> <type>"),
                |pos| Command::SetBlock(pos, (*kind).to_string()),
            ),
            _ => Command::Usage("setblock <x> <y> <z> <type>"),
        },
        "blockloc" => match args.as_slice() {
            [kind] => Command::BlockLoc((*kind).to_string()),
            _ => Command::Usage("blockloc <type>"),
        },
        "blocks" => match args.as_slice() {
            [] => Command::Blocks(String::new()),
            [prefix] => Command::Blocks((*prefix).to_string()),
            _ => Command::Usage("blocks [prefix]"),
        },
        "load" => parse_chunk(&args).map_or(Command::Usage("load <cx> <cz>"), Command::Load),
        "unload" => parse_chunk(&args).map_or(Command::Usage("unload <cx> <cz>"), Command::Unload),
        "help" | "h" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}
