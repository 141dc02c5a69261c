// menu.rs
use crate::catalog::Catalog;
use crate::domain::{Listing, ListingQuery};
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};
use std::time::Instant;

const RULE: &str = "================================================================================";

fn print_numbered<'a, W, I>(out: &mut W, listings: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Listing>,
{
    for (i, listing) in listings.into_iter().enumerate() {
        writeln!(out, "\n{}. {}", i + 1, listing)?;
    }
    Ok(())
}

fn utilities_label(listing: &Listing) -> &'static str {
    match listing.utilities_included {
        Some(true) => "includes utilities",
        _ => "utilities not included",
    }
}

/// Startup report: new listings, then the top of each structure.
pub fn print_summary<W: Write>(out: &mut W, catalog: &Catalog, new_listings: &[Listing]) -> io::Result<()> {
    writeln!(out, "\nRENTAL PROPERTY RESULTS:")?;
    writeln!(out, "Total found {} unique rental properties", catalog.sorted.len())?;

    if !new_listings.is_empty() {
        writeln!(out, "\nFound {} NEW properties since last check!", new_listings.len())?;
        for (i, listing) in new_listings.iter().enumerate() {
            writeln!(out, "\n=== NEW PROPERTY #{} ===\n{}", i + 1, listing)?;
        }
    }

    if catalog.min_heap.is_empty() {
        writeln!(out, "\nNo rental properties found.")?;
        return Ok(());
    }

    writeln!(out, "\nTop 5 cheapest rental properties (sorted):")?;
    print_numbered(out, catalog.sorted.iter().take(5))?;

    writeln!(out, "\nTop 3 cheapest rental properties (min-heap):")?;
    print_numbered(out, &catalog.cheapest(3))?;

    writeln!(out, "\nTop 3 most expensive rental properties (max-heap):")?;
    print_numbered(out, &catalog.most_expensive(3))?;

    writeln!(out, "\nTop 3 properties by priority (utilities included first, then by price):")?;
    for (i, listing) in catalog.top_priority(3).iter().enumerate() {
        writeln!(
            out,
            "\n{}. {:.2} EUR - {} ({})",
            i + 1,
            listing.price,
            listing.title,
            utilities_label(listing)
        )?;
    }
    Ok(())
}

/// Prints `message` and reads one trimmed line. Running out of input is an
/// `UnexpectedEof` error, which `run_menu` treats as a request to exit.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<String> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(line.trim().to_string())
}

/// `None` when the answer is not a number.
fn prompt_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<Option<f64>> {
    Ok(prompt(input, out, message)?.parse::<f64>().ok())
}

/// `y` / `n`, anything else means "don't care".
fn prompt_flag<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<Option<bool>> {
    let answer = prompt(input, out, message)?;
    Ok(match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    })
}

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nMenu:")?;
    writeln!(out, "1. Show all rental properties (sorted by price)")?;
    writeln!(out, "2. Filter by price range (price tree)")?;
    writeln!(out, "3. Find properties at an exact price (price tree)")?;
    writeln!(out, "4. Filter properties by utilities included")?;
    writeln!(out, "5. Show properties within certain distance from center")?;
    writeln!(out, "6. Filter by district")?;
    writeln!(out, "7. Filter by rooms, furniture, pets, parking and date")?;
    writeln!(out, "8. Show data structure and algorithm performance metrics")?;
    writeln!(out, "9. Exit")
}

fn print_timed_query<W: Write>(out: &mut W, catalog: &Catalog, query: &ListingQuery) -> io::Result<Vec<Listing>> {
    let start = Instant::now();
    let found = query.apply(&catalog.sorted);
    writeln!(out, "Filter execution time: {:.6} seconds", start.elapsed().as_secs_f64())?;
    Ok(found)
}

/// Asks for each attribute in turn; blank answers leave that criterion out.
fn read_attribute_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Result<ListingQuery, String>> {
    let mut query = ListingQuery::new();

    let min_rooms = prompt(input, out, "Minimum rooms (blank = any): ")?;
    let max_rooms = prompt(input, out, "Maximum rooms (blank = any): ")?;
    let min = match min_rooms.as_str() {
        "" => 0,
        s => match s.parse::<u32>() {
            Ok(n) => n,
            Err(_) => return Ok(Err(format!("'{s}' is not a room count"))),
        },
    };
    let max = match max_rooms.as_str() {
        "" => None,
        s => match s.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => return Ok(Err(format!("'{s}' is not a room count"))),
        },
    };
    if min > 0 || max.is_some() {
        query = query.rooms_between(min, max);
    }

    let max_price = prompt(input, out, "Maximum price (blank = any): ")?;
    if !max_price.is_empty() {
        match max_price.parse::<f64>() {
            Ok(max) => query = query.price_between(0.0, max),
            Err(_) => return Ok(Err(format!("'{max_price}' is not a price"))),
        }
    }

    if let Some(v) = prompt_flag(input, out, "Furnished? (y/n/blank): ")? {
        query = query.furnished(v);
    }
    if let Some(v) = prompt_flag(input, out, "Pets allowed? (y/n/blank): ")? {
        query = query.pets_allowed(v);
    }
    if let Some(v) = prompt_flag(input, out, "Parking? (y/n/blank): ")? {
        query = query.parking(v);
    }

    let date = prompt(input, out, "Published on (YYYY-MM-DD, blank = any): ")?;
    if !date.is_empty() {
        match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(date) => query = query.published_on(date),
            Err(_) => return Ok(Err(format!("'{date}' is not a date"))),
        }
    }

    Ok(Ok(query))
}

/// Interactive loop over any input/output pair. Returns when the user picks
/// exit or the input runs out.
pub fn run_menu<R: BufRead, W: Write>(catalog: &Catalog, input: &mut R, out: &mut W) -> io::Result<()> {
    match menu_loop(catalog, input, out) {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
        other => other,
    }
}

fn menu_loop<R: BufRead, W: Write>(catalog: &Catalog, input: &mut R, out: &mut W) -> io::Result<()> {
    loop {
        print_menu(out)?;
        let choice = prompt(input, out, "Choose action (1-9): ")?;

        match choice.as_str() {
            "1" => print_numbered(out, &catalog.sorted)?,
            "2" => {
                let min = prompt_number(input, out, "Minimum price: ")?;
                let max = prompt_number(input, out, "Maximum price: ")?;
                let (Some(min), Some(max)) = (min, max) else {
                    writeln!(out, "Please enter valid numbers for the price range.")?;
                    continue;
                };
                if catalog.by_price.is_empty() {
                    writeln!(out, "The price tree is empty.")?;
                    continue;
                }

                let start = Instant::now();
                let found = catalog.by_price.find_range(min, max);
                writeln!(out, "Price tree range search time: {:.6} seconds", start.elapsed().as_secs_f64())?;
                writeln!(out, "Found {} properties in price range {min}-{max} EUR", found.len())?;
                print_numbered(out, found)?;
            }
            "3" => {
                let Some(price) = prompt_number(input, out, "Exact price: ")? else {
                    writeln!(out, "Please enter a valid number for the price.")?;
                    continue;
                };

                let start = Instant::now();
                let found = catalog.by_price.find(price);
                writeln!(out, "Price tree search time: {:.6} seconds", start.elapsed().as_secs_f64())?;
                match found {
                    Some(listings) => {
                        writeln!(out, "Found {} properties at {price} EUR", listings.len())?;
                        print_numbered(out, listings)?;
                    }
                    None => writeln!(out, "No properties found at {price} EUR")?,
                }
            }
            "4" => {
                let answer = prompt(input, out, "Are utilities included? (y/n): ")?;
                let included = answer.eq_ignore_ascii_case("y");

                let found = print_timed_query(out, catalog, &ListingQuery::new().utilities_included(included))?;
                writeln!(
                    out,
                    "Found {} properties with utilities {}",
                    found.len(),
                    if included { "included" } else { "not included" }
                )?;
                print_numbered(out, &found)?;
            }
            "5" => {
                let Some(max_km) = prompt_number(input, out, "Maximum distance from center (km): ")? else {
                    writeln!(out, "Please enter a valid number for the distance.")?;
                    continue;
                };

                let found = print_timed_query(out, catalog, &ListingQuery::new().within_km(max_km))?;
                writeln!(out, "Found {} properties within {max_km} km from center", found.len())?;
                print_numbered(out, &found)?;
            }
            "6" => {
                let answer = prompt(input, out, "Districts (comma separated): ")?;
                let districts: Vec<&str> = answer.split(',').map(str::trim).filter(|d| !d.is_empty()).collect();
                if districts.is_empty() {
                    writeln!(out, "Please enter at least one district.")?;
                    continue;
                }

                let query = ListingQuery::new().in_districts(districts.iter().copied());
                let found = print_timed_query(out, catalog, &query)?;
                writeln!(out, "Found {} properties in {}", found.len(), districts.join(", "))?;
                print_numbered(out, &found)?;
            }
            "7" => {
                let query = match read_attribute_query(input, out)? {
                    Ok(query) => query,
                    Err(reason) => {
                        writeln!(out, "Invalid filter: {reason}")?;
                        continue;
                    }
                };

                let found = print_timed_query(out, catalog, &query)?;
                writeln!(out, "Found {} properties matching all criteria", found.len())?;
                print_numbered(out, &found)?;
            }
            "8" => print_metrics(out, catalog)?,
            "9" => {
                writeln!(out, "Thank you for using the Apartment Rental Finder!")?;
                return Ok(());
            }
            _ => writeln!(out, "Invalid choice, please enter a number from 1 to 9.")?,
        }
    }
}

fn print_metrics<W: Write>(out: &mut W, catalog: &Catalog) -> io::Result<()> {
    let m = &catalog.metrics;
    writeln!(out, "\nData Structure and Algorithm Performance Metrics:")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Number of rental properties: {}", m.listings)?;
    writeln!(out, "QuickSort execution time: {:.6} seconds", m.sort.as_secs_f64())?;
    writeln!(
        out,
        "Price tree build time: {:.6} seconds ({} nodes, {} listings)",
        m.tree.as_secs_f64(),
        m.tree_nodes,
        m.tree_listings
    )?;
    writeln!(out, "Min-Heap build time: {:.6} seconds", m.min_heap.as_secs_f64())?;
    writeln!(out, "Max-Heap build time: {:.6} seconds", m.max_heap.as_secs_f64())?;
    writeln!(out, "Priority Queue build time: {:.6} seconds", m.priority_queue.as_secs_f64())?;
    if let (Some(low), Some(high)) = (catalog.min_heap.peek(), catalog.max_heap.peek()) {
        writeln!(out, "Price span: {:.2} - {:.2} EUR", low.price, high.price)?;
    }
    writeln!(out, "{RULE}")
}
