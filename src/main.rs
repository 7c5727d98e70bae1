use KiStat::Examples::reaction_examples::reaction_examples;
use KiStat::Examples::states_examples::states_examples;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn main() {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger was not initialized: {}", e);
    }
    //
    let task: usize = 0;
    states_examples(task);
    reaction_examples(task);
}
