use clap::Parser;
use ringstore::algorithm::{reverse, sort};
use ringstore::utils::util::{format_line, pretty_format_buffer, pretty_format_layout};
use ringstore::{Buffer, BufferConfig, BufferResult};
use std::fmt::Display;

#[derive(Debug, Parser, PartialEq)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(long, help = "Slots allocated before the first growth", default_value_t = 2)]
    initial_capacity: usize,
    #[clap(long, help = "Print the physical slot table after every step")]
    show_layout: bool,
    #[clap(long, help = "Print logical index, slot and value as a table")]
    table: bool,
}

struct Printer {
    show_layout: bool,
    table: bool,
}

impl Printer {
    fn print<T: Display>(&self, step: &str, buffer: &Buffer<T>) {
        if self.table {
            println!("{step}\n{}", pretty_format_buffer(buffer));
        } else {
            println!("{step:<28} {}", format_line(buffer));
        }
        if self.show_layout {
            println!("{}", pretty_format_layout(buffer));
        }
    }
}

fn main() -> BufferResult<()> {
    env_logger::init();
    let args = Args::parse();
    let config = BufferConfig::default().with_initial_capacity(args.initial_capacity);
    let printer = Printer {
        show_layout: args.show_layout,
        table: args.table,
    };

    integers(config, &printer)?;
    vectors(config, &printer)?;
    strings(config, &printer)?;
    Ok(())
}

fn integers(config: BufferConfig, printer: &Printer) -> BufferResult<()> {
    let mut b = Buffer::with_config(config)?;
    b.push_back(3);
    b.push_back(4);
    printer.print("push_back 3, 4", &b);
    b.push_back(5);
    b.pop_front();
    printer.print("push_back 5, pop_front", &b);

    b.push_front(7);
    printer.print("push_front 7", &b);
    b.push_front(8);
    b.push_front(9);
    printer.print("push_front 8, 9", &b);

    let (first, last) = (b.begin(), b.end());
    sort(&mut b, first, last);
    printer.print("sort", &b);

    b.pop_back();
    b.pop_back();
    b.push_front(9);
    b.pop_back();
    printer.print("pop_back x2, push_front 9", &b);

    let (first, last) = (b.begin(), b.end());
    reverse(&mut b, first, last);
    printer.print("reverse", &b);
    Ok(())
}

fn vectors(config: BufferConfig, printer: &Printer) -> BufferResult<()> {
    let mut bvi: Buffer<Vec<i32>> = Buffer::with_config(config)?;
    bvi.emplace_back(vec![1; 5]);
    bvi.emplace_back_with(|| vec![0; 3]);
    for (i, row) in bvi.iter().enumerate() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("vector {i:<21} {line}");
    }
    if printer.show_layout {
        println!("capacity {} len {}", bvi.capacity(), bvi.len());
    }
    Ok(())
}

fn strings(config: BufferConfig, printer: &Printer) -> BufferResult<()> {
    let mut s = Buffer::with_config(config)?;
    let k = String::from("lorem");
    s.push_back(k.clone());
    s.push_back("ipsum".to_string());
    s.push_back("foo".to_string());
    s.push_back("bar".to_string());
    printer.print("strings", &s);
    Ok(())
}
