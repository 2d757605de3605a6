/*!

This is the long-form manual for `survey_charts` and `surveyviz`.

## Summary format

`surveyviz` reads the JSON summary produced by the survey backend. All
statistics are computed upstream; this crate only reshapes and draws them.

```text
{
  "total": 50,
  "questions": [
    {
      "key": "q_utilita",
      "label": "Utilità",
      "count": 50,
      "avg": 4.2,
      "min": 1,
      "max": 5,
      "std": 0.9,
      "median": 4,
      "distribution": {"1": 1, "2": 2, "3": 5, "4": 17, "5": 25}
    }
  ],
  "demographics": {
    "eta": {"18-24": 30, "25-34": 15},
    "istituto": {"Liceo Scientifico": 12, "Ingegneria": 8}
  },
  "crosstabs": {
    "eta": {"18-24": {"q_utilita": 4.3}, "25-34": {"q_utilita": 3.9}}
  }
}
```

Counts may also be written as strings (`"12"`). Key order is significant:
pie slices and cross-tab bars follow the order of the file. `std`,
`median`, `label`, `demographics` and `crosstabs` are optional.

A question whose distribution does not add up to `count` is still drawn,
but a warning is logged when the snapshot is published.

## Institute overrides

The institute classifier guesses a category from the free-text name typed by
respondents. Names it gets wrong can be pinned in a flat JSON object:

```text
{
  "Campus Bio-Medico": "Università",
  "Istituto Europeo di Design": "Altro"
}
```

Keys are compared to the whole label, ignoring case and surrounding spaces.
Values are one of `Scuola`, `Università` (or `Universita`), `ITS`, `Altro`.
If the file is missing or unreadable, the classifier silently falls back to
its keyword rules.

The rules, in order:

1. `univers`, `ateneo`, `politec`: Università
2. the word `its`, or "istruzione tecnica superiore": ITS
3. `accademia`, `conservatorio`, `afam`: Università
4. faculty and degree names (`ingegneria`, `medicina`, `laurea`...): Università
5. school names and track abbreviations (`liceo`, `istituto`, `IIS`, `ITIS`...): Scuola
6. anything else: Altro

## Configuration

A report can be described in a configuration file instead of flags:

```text
{
  "outputSettings": {
    "title": "Questionario orientamento 2024",
    "outputDirectory": "out",
    "chartSize": 240,
    "barMaxHeight": 200,
    "plotWidth": 560,
    "plotHeight": 240
  },
  "summaryFile": "summary.json",
  "overridesFile": "institute_overrides.json",
  "instituteDimension": "istituto",
  "lineQuestions": ["q_utilita", "q_chiarezza"],
  "crosstab": {"dimension": "eta", "question": "q_utilita", "groups": ["18-24", "25-34", "35+"]}
}
```

Paths are relative to the configuration file. Flags given on the command line
take precedence.

## Outputs

- `summary.csv`: `codice,label,media,count,min,max`, one row per question.
- `questions.svg`, `lines.svg`, `institutes.svg`, `crosstab.svg` and one
  `pie_<breakdown>.svg` per demographic breakdown.
- A JSON report summary (`report.json`, or standard output with `--out stdout`).

 */
