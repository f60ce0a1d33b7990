use super::allocator::PageAllocator;
use super::header::PageState;
use std::fmt;
use std::io::{self, Write};

const RULE: &str = "============================================";

impl PageAllocator {
    /// Prints the state of every page and block to standard output.
    pub fn dump(&self) {
        print!("{self}");
    }

    pub fn dump_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for PageAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page_size = self.config.page_size;

        writeln!(f, "### mem_dump ###")?;
        writeln!(f, "{RULE}")?;

        for (page, state) in self.directory.iter() {
            write!(
                f,
                "Page {:>3}. Address: {}. PageState: {}",
                format!("#{}", page + 1),
                self.arena.page_base(page),
                state.name()
            )?;

            match *state {
                PageState::Free => writeln!(f, ". PageSize: {page_size}")?,
                PageState::Divided { class, free_blocks, .. } => {
                    writeln!(f, ". ClassSize: {class}. FreeBlocks: {free_blocks}")?;

                    for block in 0..class.blocks_per_page(page_size) {
                        writeln!(
                            f,
                            "\tBlock {:>4}. Address: {}. IsFree: {}",
                            format!("#{}", block + 1),
                            self.block_address(page, class, block),
                            !self.block_in_use(page, class, block)
                        )?;
                    }
                }
                PageState::Chain {
                    total_size,
                    remaining,
                    next,
                } => {
                    let part = total_size / page_size - remaining;

                    write!(f, ". BlockSize: {total_size}. Part #{part}. NextPage: ")?;

                    match next {
                        Some(next) => writeln!(f, "{}", self.arena.page_base(next))?,
                        None => writeln!(f, "none")?,
                    }
                }
            }
        }

        writeln!(f, "{RULE}")
    }
}
