use std::path::PathBuf;

use pcd_parser::parsers::{
    xyz::{ParseOptions, XyzParserProvider},
    ParserProvider as _,
};

fn main() {
    let provider = XyzParserProvider {
        filename: PathBuf::from("pcd-parser/examples/data/sample.xyz"),
        options: ParseOptions::default(),
    };
    let parser = provider.get_parser();

    let num_points = parser.count_points().unwrap();
    println!("Number of points: {num_points}");

    let first = parser.records().unwrap().next();
    println!("First record: {:?}", first);
}
