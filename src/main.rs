// Copyright 2020 by Michael Thies <mail@mhthies.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::fs::File;

use log::{debug, error, info, warn};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!(
        "This is the deferred-acceptance course matcher, version {}",
        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")
    );
    let args = parse_cli_args();

    if args.get_one::<String>("OUTPUT").is_none() && !args.get_flag("print") {
        warn!("No OUTPUT file and no --print option given. The report will not be exported anywhere.");
    }

    let inpath: &String = args.get_one("INPUT").unwrap();
    debug!("Opening input file {} ...", inpath);
    let file = File::open(inpath).unwrap_or_else(|e| {
        error!("Could not open input file {}: {}", inpath, e);
        std::process::exit(exitcode::NOINPUT)
    });

    let problem = course_allocator::io::simple::read(file).unwrap_or_else(|e| {
        error!("Could not read input file: {}", e);
        std::process::exit(exitcode::DATAERR)
    });

    #[cfg(debug_assertions)]
    course_allocator::io::assert_data_consistency(&problem);

    info!(
        "Found {} courses and {} students (preference depth {}) to match.",
        problem.courses.len(),
        problem.students.len(),
        problem.preference_depth
    );
    debug!("Courses:\n{}", course_allocator::io::debug_list_of_courses(&problem));

    if problem.students.is_empty() {
        error!("Running the matching is only meaningful with 1 or more students.");
        std::process::exit(exitcode::DATAERR);
    }

    let result = course_allocator::scheduler::run(&problem);
    info!(
        "Finished matching: {} placed, {} unplaced.",
        result.student_assignment.len(),
        result.unplaced.len()
    );

    let report = course_allocator::io::build_report(&problem, &result);

    if let Some(outpath) = args.get_one::<String>("OUTPUT") {
        debug!("Opening output file {} ...", outpath);
        match File::create(outpath) {
            Err(e) => error!("Could not open output file {}: {}.", outpath, e),
            Ok(file) => match course_allocator::io::simple::write(file, &report) {
                Ok(_) => debug!("Report written to {}.", outpath),
                Err(e) => error!("Could not write report to {}: {}.", outpath, e),
            },
        }
    }

    if args.get_flag("print") {
        print!("The assignment is:\n{}", course_allocator::io::format_assignment(&result, &problem));
    }
}

/// Helper function to construct and execute parser for command line options
fn parse_cli_args() -> clap::ArgMatches {
    clap::command!()
        .arg(
            clap::Arg::new("print")
                .short('p')
                .long("print")
                .help("Print the calculated course assignment to stdout in a human readable format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("INPUT")
                .help("Sets the input file to use (simple JSON student roster + course catalog)")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("OUTPUT")
                .help("Sets the output file to write the report (placed students, course summary, unplaced students) to")
                .index(2),
        )
        .get_matches()
}
