mod evaluator;
mod helper;
mod printer;
mod reader;

use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::ops::ControlFlow;
use std::path::PathBuf;

use evaluator::{Evaluator, InterpreterEvaluator};
use helper::ReplHelper;
use printer::{InterpreterPrinter, Printer};
use reader::{Command, ReadOutput, Reader};

pub struct Options {
    pub history_file: Option<PathBuf>,
    pub max_history: usize,
}

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) {
        println!("ESLA Interactive Shell");
        println!("Type 'exit' to quit, 'help' for commands");

        loop {
            let input = self.reader.read();
            match input {
                ReadOutput::ControlFlow(ControlFlow::Break(())) => break,
                ReadOutput::ControlFlow(ControlFlow::Continue(())) => continue,
                ReadOutput::Command(command) => self.run_command(command),
                ReadOutput::Value(source) => {
                    let result = self.evaluator.evaluate(&source);
                    self.printer.print(result)
                }
            }
        }

        self.reader.save_history();
        println!("Goodbye!");
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::Vars => self.evaluator.print_variables(),
            Command::History => self.reader.print_history(),
            Command::Clear => self.reader.clear_screen(),
            Command::Help => self.printer.print_help(),
        }
    }
}

pub fn start(options: Options) -> rustyline::Result<()> {
    let config = Config::builder()
        .max_history_size(options.max_history)?
        .auto_add_history(false)
        .build();
    let mut rl = Editor::<ReplHelper, DefaultHistory>::with_config(config)?;
    rl.set_helper(Some(ReplHelper::new()));

    Repl {
        reader: Reader::new(rl, options.history_file),
        evaluator: InterpreterEvaluator::new(),
        printer: InterpreterPrinter {},
    }
    .run();

    Ok(())
}
