// ABOUTME: Example dumping the decoded contents of a DTB file
// ABOUTME: Shows header fields, memory reservations, the node tree and symbols

use fdt_decoder::{FdtError, FdtNode, FdtParser};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(dtb_path) = args.get(1) else {
        eprintln!("usage: dump_tree <path/to/blob.dtb>");
        process::exit(2);
    };

    println!("Decoding DTB file: {dtb_path}");
    println!();

    let dtb_data = match fs::read(dtb_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("failed to read '{dtb_path}': {e}");
            process::exit(1);
        }
    };

    if let Err(e) = dump(&dtb_data) {
        eprintln!("failed to decode DTB: {e}");
        process::exit(1);
    }
}

fn dump(dtb_data: &[u8]) -> Result<(), FdtError> {
    let parser = FdtParser::new(dtb_data);

    let header = parser.parse_header()?;
    println!("Header");
    println!("------");
    println!("Magic:           {:#010x}", header.magic);
    println!("Total size:      {} bytes", header.totalsize);
    println!("Version:         {}", header.version);
    println!("Last compatible: {}", header.last_comp_version);
    println!("Boot CPU ID:     {}", header.boot_cpuid_phys);
    println!("Struct offset:   {:#x}", header.off_dt_struct);
    println!("Struct size:     {} bytes", header.size_dt_struct);
    println!("Strings offset:  {:#x}", header.off_dt_strings);
    println!("Strings size:    {} bytes", header.size_dt_strings);
    println!("Memory rsv:      {:#x}", header.off_mem_rsvmap);
    println!();

    println!("Memory reservations");
    println!("-------------------");
    let mut any = false;
    for (i, reservation) in parser.memory_reservations()?.enumerate() {
        any = true;
        println!(
            "Reservation {}: {:#018x} - {:#018x} ({} bytes)",
            i,
            reservation.address,
            reservation.address + reservation.size,
            reservation.size
        );
    }
    if !any {
        println!("No memory reservations found");
    }
    println!();

    let tree = parser.parse_tree()?;
    let node_count = tree.iter_nodes().count();
    let property_count: usize = tree.iter_nodes().map(|node| node.properties.len()).sum();

    println!("Tree ({node_count} nodes, {property_count} properties)");
    println!("----");
    print_node(&tree, 0);
    println!();

    let symbols = parser.symbol_table()?;
    println!("Symbols");
    println!("-------");
    if symbols.is_empty() {
        println!("No /__symbols__ node found");
    } else {
        for (label, path) in symbols.iter() {
            println!("{label} -> {path}");
        }
    }

    Ok(())
}

fn print_node(node: &FdtNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let display_name = if node.name.is_empty() {
        "/"
    } else {
        node.name.as_str()
    };
    println!("{indent}{display_name}");

    for (name, value) in node.iter_properties() {
        println!("{indent}  {} ({} bytes)", name, value.len());
    }

    for child in node.iter_children() {
        print_node(child, depth + 1);
    }
}
