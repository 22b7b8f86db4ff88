use clap::{Arg, Command};

pub const CMD_GENERATE_KEY: &str = "generate-key";
pub const CMD_HASH_PASSWORD: &str = "hash-password";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_GENERATE_KEY)
                .about("Print a new random cookie signing key (base64) for --cookie-key"),
        )
        .subcommand(
            Command::new(CMD_HASH_PASSWORD)
                .about("Hash the shared site password and write it for --password-file")
                .arg(
                    Arg::new("password")
                        .help("Password visitors will type; compared case-insensitively")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("File to write the hash to")
                        .default_value("password"),
                ),
        )
}
